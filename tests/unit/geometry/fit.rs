use super::*;

#[test]
fn picks_the_limiting_axis() {
    let s = fit_scale(
        Size::new(200.0, 60.0),
        Size::new(800.0, 600.0),
        1.0,
        ScaleBounds::new(0.01, 100.0),
    );
    assert_eq!(s, 4.0);

    let s = fit_scale(
        Size::new(100.0, 300.0),
        Size::new(800.0, 600.0),
        0.5,
        ScaleBounds::new(0.01, 100.0),
    );
    assert_eq!(s, 1.0);
}

#[test]
fn result_is_clamped() {
    let bounds = ScaleBounds::new(0.5, 2.0);
    assert_eq!(fit_scale(Size::new(10.0, 10.0), Size::new(1000.0, 1000.0), 1.0, bounds), 2.0);
    assert_eq!(fit_scale(Size::new(1000.0, 1000.0), Size::new(10.0, 10.0), 1.0, bounds), 0.5);
}

#[test]
fn degenerate_sizes_fall_back_to_unit_scale() {
    let b = ScaleBounds::default();
    assert_eq!(fit_scale(Size::ZERO, Size::new(10.0, 10.0), 0.9, b), 1.0);
    assert_eq!(fit_scale(Size::new(10.0, 10.0), Size::ZERO, 0.9, b), 1.0);
    assert_eq!(fit_scale(Size::new(f64::NAN, 10.0), Size::new(10.0, 10.0), 0.9, b), 1.0);
}
