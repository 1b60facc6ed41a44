use velox_dom::{ConfigError, DiagnosticLevel, Namespace, PlatformConfig};

#[test]
fn overlay_extends_web_defaults() {
    let config = PlatformConfig::from_json(
        r#"{
            "reserved_tags": ["x-panel"],
            "namespaces": { "mi": "math", "x-shape": "svg" },
            "diagnostics": "production"
        }"#,
    )
    .expect("valid overlay");

    assert!(config.is_reserved_tag("div"));
    assert!(config.is_reserved_tag("x-panel"));
    assert!(!config.is_reserved_tag("X-Panel"));
    assert_eq!(config.tag_namespace("mi"), Some(Namespace::Math));
    assert_eq!(config.tag_namespace("MI"), None);
    assert_eq!(config.tag_namespace("x-shape"), Some(Namespace::Svg));
    assert_eq!(config.tag_namespace("circle"), Some(Namespace::Svg));
    assert_eq!(config.diagnostics, DiagnosticLevel::Production);
    assert!(!config.is_development());
}

#[test]
fn empty_overlay_is_the_web_platform() {
    let config = PlatformConfig::from_json("{}").expect("empty overlay");
    assert_eq!(config, PlatformConfig::web());
}

#[test]
fn tag_prefix_from_json() {
    let config = PlatformConfig::from_json(r#"{"tag_prefix": "weex:"}"#).expect("prefix");
    assert_eq!(config.parse_platform_tag_name("weex:text"), "text");
}

#[test]
fn malformed_overlays_are_rejected() {
    let err = PlatformConfig::from_json("{ nope").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid platform config"));

    let err = PlatformConfig::from_json(r#"{"reserved": ["a"]}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = PlatformConfig::from_json(r#"{"namespaces": {"g": "xul"}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn empty_tag_names_are_rejected() {
    let err = PlatformConfig::from_json(r#"{"reserved_tags": ["div", " "]}"#).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyTag("reserved_tags")));
    assert_eq!(err.to_string(), "empty tag name in `reserved_tags`");

    let err = PlatformConfig::from_json(r#"{"namespaces": {"": "svg"}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyTag("namespaces")));
}
