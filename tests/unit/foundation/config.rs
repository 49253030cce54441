use super::*;

#[test]
fn empty_document_yields_defaults() {
    let cfg = BadgeConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, BadgeConfig::default());
    assert!(cfg.export.embed_fonts);
    assert_eq!(cfg.export.clip_mode, ClipMode::ClipPath);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let cfg = BadgeConfig::from_json_str(
        r#"{ "viewport": { "maxZoom": 4.0 }, "export": { "clipMode": "mask" } }"#,
    )
    .unwrap();
    assert_eq!(cfg.viewport.max_zoom, 4.0);
    assert_eq!(cfg.viewport.min_zoom, ViewportPolicy::default().min_zoom);
    assert_eq!(cfg.export.clip_mode, ClipMode::Mask);
}

#[test]
fn invalid_policies_are_rejected() {
    let err = BadgeConfig::from_json_str(r#"{ "viewport": { "minZoom": 10.0 } }"#).unwrap_err();
    assert!(matches!(err, BadgeError::Validation(_)));

    let err = BadgeConfig::from_json_str(r#"{ "viewport": { "fitMargin": 1.5 } }"#).unwrap_err();
    assert!(err.to_string().contains("fitMargin"));

    let err = BadgeConfig::from_json_str(r#"{ "viewport": { "wheelStep": 1.0 } }"#).unwrap_err();
    assert!(err.to_string().contains("wheelStep"));

    let err = BadgeConfig::from_json_str(r#"{ "fonts": { "timeoutSecs": 0 } }"#).unwrap_err();
    assert!(err.to_string().contains("timeoutSecs"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = BadgeConfig::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, BadgeError::Serde(_)));
}
