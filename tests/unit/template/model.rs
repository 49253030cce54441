use super::*;

const BADGE: &str = r##"{
    "id": "round-badge",
    "name": "Round Badge",
    "width": 200,
    "height": 60,
    "layers": [
        { "id": "badge-bg", "kind": "shape", "path": "M-100 -30h200v60h-200z",
          "x": "50%", "y": "50%", "paint": { "fill": "#112233", "strokeLinejoin": "round" } },
        { "id": "title", "kind": "text", "text": "Hello", "x": "50%", "y": "50%",
          "font": { "family": "Roboto", "size": 18 }, "clipRef": "badge-bg" },
        { "id": "icon", "kind": "svgImage", "svg": "<svg viewBox=\"0 0 24 24\"></svg>",
          "x": 10, "y": 10, "scale": 2, "transformOrigin": "centroid" }
    ]
}"##;

#[test]
fn parses_all_layer_kinds() {
    let t = Template::from_json_str(BADGE).unwrap();
    assert_eq!(t.intrinsic_size(), Some(Size::new(200.0, 60.0)));
    let kinds: Vec<_> = t.layers.iter().map(|l| l.content.kind()).collect();
    assert_eq!(kinds, vec![LayerKind::Shape, LayerKind::Text, LayerKind::SvgImage]);

    let LayerContent::Shape(shape) = &t.layers[0].content else {
        panic!("expected shape");
    };
    assert_eq!(shape.x, Coordinate::Percent(50.0));
    assert_eq!(shape.paint.stroke_linejoin, Some(LineJoin::Round));

    let LayerContent::Text(text) = &t.layers[1].content else {
        panic!("expected text");
    };
    assert_eq!(text.clip_ref.as_deref(), Some("badge-bg"));
    assert_eq!(text.text_anchor, TextAnchor::Middle);

    let LayerContent::SvgImage(img) = &t.layers[2].content else {
        panic!("expected svg image");
    };
    assert_eq!(img.transform_origin, Some(TransformOrigin::Centroid));
    assert_eq!(img.x, Coordinate::Absolute(10.0));
}

#[test]
fn duplicate_layer_ids_are_rejected() {
    let json = r#"{ "id": "t", "layers": [
        { "id": "a", "kind": "text" },
        { "id": "a", "kind": "text" }
    ] }"#;
    let err = Template::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("duplicate layer id 'a'"));
}

#[test]
fn invalid_dimensions_are_rejected() {
    let json = r#"{ "id": "t", "width": -1, "layers": [] }"#;
    assert!(matches!(
        Template::from_json_str(json),
        Err(BadgeError::Validation(_))
    ));
}

#[test]
fn missing_dimensions_are_reported_not_fatal() {
    let t = Template::from_json_str(r#"{ "id": "t", "width": 10, "layers": [] }"#).unwrap();
    assert_eq!(t.intrinsic_size(), None);
    assert_eq!(t.extent(), Size::new(10.0, 0.0));
    assert!(matches!(
        t.require_intrinsic_size(),
        Err(BadgeError::MissingDimension(_))
    ));
}

#[test]
fn overrides_are_sparse() {
    let o = overrides_from_json_str(
        r##"{ "title": { "text": "Hi", "fontSize": 24 }, "icon": { "transformOrigin": { "point": { "x": 1, "y": 2 } } } }"##,
    )
    .unwrap();
    let title = &o["title"];
    assert_eq!(title.text.as_deref(), Some("Hi"));
    assert_eq!(title.font_size, Some(24.0));
    assert_eq!(title.fill, None);
    assert_eq!(
        o["icon"].transform_origin,
        Some(TransformOrigin::Point { x: 1.0, y: 2.0 })
    );
}
