//! Unit tests for manifest errors.

use std::error::Error as _;

use switchyard::ActionName;

use super::*;

#[test]
fn json_error_names_the_format() {
    let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated JSON");
    let err = ManifestError::from(source);
    assert!(matches!(err, ManifestError::Json(_)));
    assert!(err.to_string().starts_with("failed to parse JSON manifest: "));
    assert!(err.source().is_some());
}

#[test]
fn config_errors_pass_through_unchanged() {
    let action = ActionName::parse("greet").expect("valid name");
    let inner = ConfigError::missing_handler(action);
    let expected = inner.to_string();

    let err = ManifestError::from(inner);

    assert!(matches!(err, ManifestError::Config(ConfigError::MissingHandler { .. })));
    assert_eq!(err.to_string(), expected);
}
