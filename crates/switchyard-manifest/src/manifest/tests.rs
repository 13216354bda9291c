//! Unit tests for manifest parsing and conversion.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use switchyard::{
    CallableRegistry, ConfigError, NoResolver, Request, Response, TargetRole, handler_fn,
    observer_fn,
};

use super::*;

type Registry = CallableRegistry<(), String, String>;
type Journal = Arc<Mutex<Vec<&'static str>>>;

const GREETING_YAML: &str = "\
greet:
  action: app.greet
  observer: [audit.log, metrics.count]
farewell:
  action: app.farewell
  observer: audit.log
";

const GREETING_JSON: &str = r#"{
  "greet": {
    "action": "app.greet",
    "observer": ["audit.log", "metrics.count"]
  },
  "farewell": {
    "action": "app.farewell",
    "observer": "audit.log"
  }
}"#;

fn expected_manifest() -> ActionManifest {
    ActionManifest::new()
        .with_action(
            "greet",
            ActionEntry::new()
                .with_action("app.greet")
                .with_observer("audit.log")
                .with_observer("metrics.count"),
        )
        .with_action(
            "farewell",
            ActionEntry::new()
                .with_action("app.farewell")
                .with_observer("audit.log"),
        )
}

fn recorder(
    journal: &Journal,
    label: &'static str,
) -> impl switchyard::Observer<(), String, String> + use<> {
    let entries = Arc::clone(journal);
    observer_fn(move |_: &Response<(), String, String>| {
        entries.lock().expect("journal lock").push(label);
        Ok(())
    })
}

#[fixture]
fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

#[fixture]
fn registry(journal: Journal) -> (Registry, Journal) {
    let mut registry = Registry::new();
    registry
        .register_handler(
            "app.greet",
            handler_fn(|request: &Request<(), String>| {
                Ok(request.success(format!("hello, {}", request.input())))
            }),
        )
        .expect("first registration");
    registry
        .register_handler(
            "app.farewell",
            handler_fn(|request: &Request<(), String>| {
                Ok(request.success(format!("goodbye, {}", request.input())))
            }),
        )
        .expect("first registration");
    registry
        .register_observer("audit.log", recorder(&journal, "audit.log"))
        .expect("first registration");
    registry
        .register_observer("metrics.count", recorder(&journal, "metrics.count"))
        .expect("first registration");
    (registry, journal)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn yaml_and_json_describe_the_same_manifest() {
    let yaml = ActionManifest::from_yaml_str(GREETING_YAML).expect("valid YAML");
    let json = ActionManifest::from_json_str(GREETING_JSON).expect("valid JSON");
    assert_eq!(yaml, expected_manifest());
    assert_eq!(json, expected_manifest());
}

#[rstest]
#[case::single("observer: audit.log", ObserverRefs::One("audit.log".to_owned()))]
#[case::list("observer: [audit.log]", ObserverRefs::Many(vec!["audit.log".to_owned()]))]
fn observer_accepts_a_reference_or_a_list(
    #[case] observer: &str,
    #[case] expected: ObserverRefs,
) {
    let source = format!("greet:\n  action: app.greet\n  {observer}\n");
    let manifest = ActionManifest::from_yaml_str(&source).expect("valid YAML");
    let entry = manifest.get("greet").expect("greet entry");
    assert_eq!(entry.observer(), Some(&expected));
    assert_eq!(expected.as_slice(), ["audit.log".to_owned()]);
}

#[test]
fn entry_without_action_still_parses() {
    let manifest = ActionManifest::from_json_str(r#"{"audit": {"observer": "audit.log"}}"#)
        .expect("valid JSON");
    let entry = manifest.get("audit").expect("audit entry");
    assert_eq!(entry.action(), None);
}

#[rstest]
#[case::yaml_unknown_key(ActionManifest::from_yaml_str("greet:\n  handler: app.greet\n"))]
#[case::yaml_not_a_map(ActionManifest::from_yaml_str("- greet\n"))]
fn malformed_yaml_is_rejected(#[case] result: Result<ActionManifest, ManifestError>) {
    assert!(matches!(result, Err(ManifestError::Yaml(_))));
}

#[rstest]
#[case::json_unknown_key(ActionManifest::from_json_str(r#"{"greet": {"observers": []}}"#))]
#[case::json_truncated(ActionManifest::from_json_str(r#"{"greet": "#))]
#[case::json_wrong_observer_type(ActionManifest::from_json_str(r#"{"greet": {"observer": 7}}"#))]
fn malformed_json_is_rejected(#[case] result: Result<ActionManifest, ManifestError>) {
    assert!(matches!(result, Err(ManifestError::Json(_))));
}

#[test]
fn json_manifest_repeating_a_key_is_rejected() {
    let err = ActionManifest::from_json_str(
        r#"{"greet": {"action": "app.greet"}, "greet": {"action": "app.farewell"}}"#,
    )
    .expect_err("repeated key");
    assert!(matches!(err, ManifestError::Json(_)));
    assert!(err.to_string().contains("duplicate action key `greet`"), "{err}");
}

#[test]
fn yaml_manifest_repeating_a_key_is_rejected() {
    let result = ActionManifest::from_yaml_str(
        "greet:\n  action: app.greet\ngreet:\n  action: app.farewell\n",
    );
    assert!(matches!(result, Err(ManifestError::Yaml(_))));
}

#[test]
fn manifest_serialises_back_to_its_source_shape() {
    let json = serde_json::to_value(expected_manifest()).expect("serialisable");
    let reparsed: serde_json::Value = serde_json::from_str(GREETING_JSON).expect("valid JSON");
    assert_eq!(json, reparsed);
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[test]
fn into_config_keeps_every_entry_as_references() {
    let config = expected_manifest().into_config::<(), String, String>();
    let entries: Vec<(String, bool, usize)> = config
        .into_iter()
        .map(|(name, entry)| (name, entry.has_handler(), entry.observers().len()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("farewell".to_owned(), true, 1),
            ("greet".to_owned(), true, 2),
        ]
    );
}

#[rstest]
fn coerced_manifest_dispatches_and_notifies_in_order(registry: (Registry, Journal)) {
    let (resolver, journal) = registry;
    let dispatcher = ActionManifest::from_yaml_str(GREETING_YAML)
        .expect("valid YAML")
        .coerce(&resolver)
        .expect("references resolve");

    let response = dispatcher
        .call("greet", "ada".to_owned(), ())
        .expect("greet is registered");

    assert_eq!(response.output(), "hello, ada");
    assert_eq!(
        *journal.lock().expect("journal lock"),
        vec!["audit.log", "metrics.count"]
    );
}

#[test]
fn missing_action_is_reported_when_coercing() {
    let manifest =
        ActionManifest::from_yaml_str("audit:\n  observer: audit.log\n").expect("valid YAML");
    let err = manifest
        .coerce::<(), String, String, _>(&NoResolver)
        .expect_err("audit has no handler");
    assert!(matches!(
        err,
        ManifestError::Config(ConfigError::MissingHandler { ref action })
            if action.as_str() == "audit"
    ));
}

#[rstest]
fn unknown_reference_is_reported_when_coercing(registry: (Registry, Journal)) {
    let (resolver, _) = registry;
    let manifest = ActionManifest::new().with_action(
        "greet",
        ActionEntry::new()
            .with_action("app.greet")
            .with_observer("audit.missing"),
    );
    let err = manifest
        .coerce::<(), String, String, _>(&resolver)
        .expect_err("unknown observer");
    assert!(matches!(
        err,
        ManifestError::Config(ConfigError::Unresolvable { role: TargetRole::Observer, .. })
    ));
}

#[rstest]
fn keys_colliding_after_normalisation_are_reported(registry: (Registry, Journal)) {
    let (resolver, _) = registry;
    let manifest: ActionManifest = [
        ("greet".to_owned(), ActionEntry::new().with_action("app.greet")),
        (" greet ".to_owned(), ActionEntry::new().with_action("app.greet")),
    ]
    .into_iter()
    .collect();
    let err = manifest
        .coerce::<(), String, String, _>(&resolver)
        .expect_err("duplicate after trimming");
    assert!(matches!(
        err,
        ManifestError::Config(ConfigError::DuplicateAction { .. })
    ));
}
