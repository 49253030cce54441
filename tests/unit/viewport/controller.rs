use super::*;
use crate::viewport::input::DeltaMode;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn assert_vb_eq(a: ViewBox, b: ViewBox) {
    assert!(
        approx(a.x, b.x) && approx(a.y, b.y) && approx(a.width, b.width) && approx(a.height, b.height),
        "{a:?} != {b:?}"
    );
}

fn fitted() -> ViewportController {
    let mut vp = ViewportController::new(ViewportPolicy::default(), Some(Size::new(200.0, 60.0)));
    vp.set_container_size(Size::new(800.0, 600.0));
    vp
}

#[test]
fn first_container_size_auto_fits() {
    let vp = fitted();
    // min(800/200, 600/60) * 0.9 = 3.6
    assert!(approx(vp.zoom(), 3.6));
    assert_eq!(vp.zoom_percentage(), 360);
    let c = vp.view_box().center();
    assert!(approx(c.x, 100.0) && approx(c.y, 30.0));
}

#[test]
fn auto_fit_is_idempotent() {
    let mut vp = fitted();
    let content = Rect::new(0.0, 0.0, 200.0, 60.0);
    vp.auto_fit(content, Size::new(640.0, 480.0));
    let once = vp.view_box();
    vp.auto_fit(content, Size::new(640.0, 480.0));
    assert_vb_eq(vp.view_box(), once);
}

#[test]
fn set_zoom_preserves_center_and_clamps() {
    let mut vp = fitted();
    vp.pan(37.0, -12.0);
    let before = vp.view_box().center();

    vp.set_zoom(2.0);
    assert!(approx(vp.zoom(), 2.0));
    let after = vp.view_box().center();
    assert!(approx(before.x, after.x) && approx(before.y, after.y));

    vp.set_zoom(100.0);
    assert!(approx(vp.zoom(), 8.0));
    vp.set_zoom(0.001);
    assert!(approx(vp.zoom(), 0.1));
    vp.set_zoom(f64::NAN);
    assert!(approx(vp.zoom(), 0.1));
}

#[test]
fn pan_is_additive() {
    let mut a = fitted();
    let mut b = a.clone();
    a.pan(10.0, 20.0);
    a.pan(5.0, -3.0);
    b.pan(15.0, 17.0);
    assert_vb_eq(a.view_box(), b.view_box());
}

#[test]
fn pan_past_content_edge_and_back_is_additive() {
    let mut a = fitted();
    let mut b = a.clone();
    a.pan(5000.0, 0.0);
    a.pan(-5000.0, 0.0);
    b.pan(0.0, 0.0);
    assert_vb_eq(a.view_box(), b.view_box());

    let mut c = fitted();
    let mut d = c.clone();
    c.pan(5000.0, -700.0);
    c.pan(-4990.0, 690.0);
    d.pan(10.0, -10.0);
    assert_vb_eq(c.view_box(), d.view_box());
}

#[test]
fn zoom_after_overscroll_starts_from_visible_center() {
    let mut vp = fitted();
    vp.pan(100_000.0, 0.0);
    vp.set_zoom(2.0);
    assert!(approx(vp.view_box().center().x, 0.0));
    vp.pan(-20.0, 0.0);
    assert!(approx(vp.view_box().center().x, 10.0));
}

#[test]
fn pan_divides_pixels_by_zoom() {
    let mut vp = fitted();
    vp.set_zoom(2.0);
    let before = vp.view_box();
    vp.pan(20.0, 10.0);
    assert!(approx(vp.view_box().x, before.x - 10.0));
    assert!(approx(vp.view_box().y, before.y - 5.0));
}

#[test]
fn pan_clamps_center_to_content() {
    let mut vp = fitted();
    vp.pan(100_000.0, -100_000.0);
    let c = vp.view_box().center();
    assert!(approx(c.x, 0.0));
    assert!(approx(c.y, 60.0));

    let policy = ViewportPolicy {
        clamp_pan_to_content: false,
        ..ViewportPolicy::default()
    };
    let mut free = ViewportController::new(policy, Some(Size::new(200.0, 60.0)));
    free.set_container_size(Size::new(800.0, 600.0));
    free.pan(100_000.0, 0.0);
    assert!(free.view_box().center().x < -1000.0);
}

#[test]
fn not_ready_container_makes_everything_a_no_op() {
    let mut vp = ViewportController::new(ViewportPolicy::default(), Some(Size::new(200.0, 60.0)));
    vp.set_container_size(Size::new(0.0, 300.0));
    assert!(!vp.is_ready());
    let before = vp.view_box();
    vp.set_zoom(2.0);
    vp.pan(10.0, 10.0);
    vp.handle_wheel(WheelInput::pixels(120.0));
    vp.begin_pinch(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    vp.handle_pinch(Point::new(0.0, 0.0), Point::new(30.0, 0.0));
    assert_eq!(vp.view_box(), before);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.screen_to_template(Point::ORIGIN), None);
}

#[test]
fn reset_zoom_shows_intrinsic_extent() {
    let mut vp = fitted();
    vp.set_zoom(5.0);
    vp.pan(40.0, 40.0);
    vp.reset_zoom();
    assert_eq!(vp.view_box(), ViewBox::from_size(200.0, 60.0));
    assert!(approx(vp.zoom(), 4.0));
}

#[test]
fn resize_keeps_center_and_zoom() {
    let mut vp = fitted();
    vp.set_zoom(2.0);
    let center = vp.view_box().center();
    vp.set_container_size(Size::new(400.0, 300.0));
    assert!(approx(vp.zoom(), 2.0));
    let c = vp.view_box().center();
    assert!(approx(c.x, center.x) && approx(c.y, center.y));
    assert!(approx(vp.view_box().height, 150.0));
}

#[test]
fn mouse_wheel_steps_and_trackpad_scales_continuously() {
    let mut vp = fitted();
    vp.set_zoom(2.0);
    vp.handle_wheel(WheelInput::pixels(100.0));
    assert!(approx(vp.zoom(), 2.0 / 1.1));

    vp.set_zoom(2.0);
    vp.handle_wheel(WheelInput {
        delta_y: -3.0,
        delta_mode: DeltaMode::Line,
        ctrl_key: false,
    });
    assert!(approx(vp.zoom(), 2.2));

    vp.set_zoom(2.0);
    vp.handle_wheel(WheelInput::pinch(10.0));
    assert!(approx(vp.zoom(), 2.0 * (-0.1f64).exp()));
}

#[test]
fn pinch_scales_from_start_zoom() {
    let mut vp = fitted();
    vp.set_zoom(2.0);
    vp.begin_pinch(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    vp.handle_pinch(Point::new(0.0, 0.0), Point::new(150.0, 0.0));
    assert!(approx(vp.zoom(), 3.0));
    vp.handle_pinch(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
    assert!(approx(vp.zoom(), 1.0));
    vp.end_pinch();
    vp.handle_pinch(Point::new(0.0, 0.0), Point::new(400.0, 0.0));
    assert!(approx(vp.zoom(), 1.0));
}

#[test]
fn gesture_scale_is_cumulative() {
    let mut vp = fitted();
    vp.set_zoom(4.0);
    vp.begin_gesture();
    vp.handle_gesture(0.5);
    vp.handle_gesture(0.75);
    assert!(approx(vp.zoom(), 3.0));
    vp.end_gesture();
    vp.handle_gesture(2.0);
    assert!(approx(vp.zoom(), 3.0));
}

#[test]
fn zoom_in_out_use_wheel_step() {
    let mut vp = fitted();
    vp.set_zoom(2.0);
    vp.zoom_in();
    assert!(approx(vp.zoom(), 2.2));
    vp.zoom_out();
    assert!(approx(vp.zoom(), 2.0));
}

#[test]
fn screen_template_mapping_round_trips() {
    let mut vp = fitted();
    vp.set_zoom(2.0);
    let p = Point::new(123.0, 45.0);
    let t = vp.screen_to_template(p).unwrap();
    let back = vp.template_to_screen(t).unwrap();
    assert!(approx(back.x, p.x) && approx(back.y, p.y));
    assert!(approx(t.x, vp.view_box().x + 61.5));
}
