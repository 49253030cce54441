use super::*;

fn assert_point_near(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
        "{a:?} != {b:?}"
    );
}

#[test]
fn unit_scale_and_zero_rotation_is_identity() {
    let t = scale_origin_transform(Point::new(12.0, 7.0), 1.0, 0.0);
    assert!(t.is_identity());
    assert_eq!(t.to_string(), "");
    assert_eq!(t.to_affine(), Affine::IDENTITY);
}

#[test]
fn origin_is_a_fixed_point_of_the_composition() {
    let origin = Point::new(12.0, 12.0);
    for (scale, rot) in [(2.0, 0.0), (0.5, 45.0), (1.0, 90.0), (3.0, -30.0)] {
        let a = scale_origin_transform(origin, scale, rot).to_affine();
        assert_point_near(a * origin, origin);
    }
}

#[test]
fn composition_renders_translate_scale_rotate_translate_back() {
    let t = scale_origin_transform(Point::new(12.0, 6.0), 2.0, 45.0);
    assert_eq!(
        t.to_string(),
        "translate(12 6) scale(2) rotate(45) translate(-12 -6)"
    );

    let a = t.to_affine();
    let corner = Point::new(24.0, 6.0);
    let moved = a * corner;
    let expected = Point::new(
        12.0 + 24.0 * std::f64::consts::FRAC_1_SQRT_2,
        6.0 + 24.0 * std::f64::consts::FRAC_1_SQRT_2,
    );
    assert_point_near(moved, expected);
}

#[test]
fn no_op_steps_are_dropped_and_nan_never_reaches_output() {
    let t = TransformList::new()
        .translate(0.0, 0.0)
        .rotate(0.0)
        .scale(1.0)
        .scale(f64::NAN)
        .translate(f64::NAN, 5.0);
    assert_eq!(t.ops(), &[TransformOp::Translate(0.0, 5.0)]);
    assert_eq!(t.to_string(), "translate(0 5)");
}

#[test]
fn rotate_about_matches_explicit_pivot() {
    let c = Point::new(100.0, 30.0);
    let t = TransformList::new().rotate_about(90.0, c);
    assert_eq!(t.to_string(), "rotate(90 100 30)");
    assert_point_near(t.to_affine() * c, c);

    let explicit = TransformList::new()
        .translate(100.0, 30.0)
        .rotate(90.0)
        .translate(-100.0, -30.0);
    let p = Point::new(110.0, 30.0);
    assert_point_near(t.to_affine() * p, explicit.to_affine() * p);
}

#[test]
fn then_appends_in_order() {
    let t = TransformList::new()
        .translate(5.0, 5.0)
        .then(TransformList::new().scale(2.0));
    assert_eq!(t.to_string(), "translate(5 5) scale(2)");
    assert_point_near(t.to_affine() * Point::new(1.0, 1.0), Point::new(7.0, 7.0));
}
