//! Command-line overrides applied to loaded trees.

use paramtree::{
    Error, Value,
    overlay::{self, OverlayError, OverlayOptions},
};

use crate::helpers::{test_registry, tree, tree_with};

fn apply(json: &str, args: &[&str]) -> paramtree::Result<paramtree::Config> {
    let mut config = tree(json);
    overlay::update_from_args_with(&mut config, args, OverlayOptions::default(), &test_registry())?;
    Ok(config)
}

#[test]
fn test_only_passed_keys_change() {
    let config = apply(r#"{"a": {"b": 3, "c": 4}}"#, &["--a.b", "7"]).unwrap();
    assert_eq!(config, tree(r#"{"a": {"b": 7, "c": 4}}"#));
}

#[test]
fn test_values_keep_the_default_type() {
    let config = apply(
        r#"{"lr": 0.1, "epochs": 10, "name": "base", "shuffle": true}"#,
        &["--lr", "1", "--epochs=12", "--name", "-run-", "--shuffle", "No"],
    )
    .unwrap();
    assert_eq!(config.get("lr").unwrap(), &Value::Float(1.0));
    assert_eq!(config.get("epochs").unwrap(), &12);
    assert_eq!(config.get("name").unwrap(), &"-run-");
    assert_eq!(config.get("shuffle").unwrap(), &false);
}

#[test]
fn test_list_overrides() {
    let json = r#"{"net": {"sizes": [1, 2], "tags": ["a"]}}"#;

    let config = apply(json, &["--net.sizes", "8", "16", "32", "--net.tags", "x", "y"]).unwrap();
    assert_eq!(config.get("net.sizes").unwrap(), &Value::from(vec![8, 16, 32]));
    assert_eq!(config.get("net.tags").unwrap(), &Value::from(vec!["x", "y"]));

    let config = apply(json, &["--net.sizes.1", "5"]).unwrap();
    assert_eq!(config.get("net.sizes").unwrap(), &Value::from(vec![1, 5]));

    // the whole-list flag wins over an element flag
    let config = apply(json, &["--net.sizes.0", "9", "--net.sizes", "4", "4"]).unwrap();
    assert_eq!(config.get("net.sizes").unwrap(), &Value::from(vec![4, 4]));
}

#[test]
fn test_references_and_none() {
    let registry = test_registry();
    let mut config = tree_with(
        r#"{"layer": "__type__(layers.Linear)", "note": "x", "fn": "__function__(ops.double)"}"#,
        &registry,
    );
    overlay::update_from_args_with(
        &mut config,
        ["--layer", "'__type__(layers.Conv)'", "--note", "None"],
        OverlayOptions::default(),
        &registry,
    )
    .unwrap();

    assert_eq!(config.get("layer").and_then(Value::as_type).unwrap().name(), "Conv");
    assert!(config.get("note").unwrap().is_null());
    assert!(config.get("fn").and_then(Value::as_function).is_some());
}

#[test]
fn test_bad_tokens_leave_tree_untouched() {
    let json = r#"{"flag": true, "n": 1}"#;
    let mut config = tree(json);

    let err = overlay::update_from_args_with(
        &mut config,
        ["--n", "2", "--flag", "maybe"],
        OverlayOptions::default(),
        &test_registry(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Overlay(OverlayError::InvalidBool { .. })));
    assert_eq!(config, tree(json));

    let err = apply(json, &["--n", "two"]).unwrap_err();
    assert!(err.is_overlay_error());
}

#[test]
fn test_unknown_arguments_are_ignored() {
    let config = apply(
        r#"{"n": 1}"#,
        &["--unknown", "5", "positional", "--n", "3"],
    )
    .unwrap();
    assert_eq!(config, tree(r#"{"n": 3}"#));

    let overrides = overlay::overrides_with(
        &tree(r#"{"n": 1, "m": 2}"#),
        ["--n", "1", "--m", "5"],
        OverlayOptions::default().warn_unknown(true),
        &test_registry(),
    )
    .unwrap();
    // re-typing the default is not an override
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides["m"], 5);
}

#[test]
fn test_tuples_are_overridden_whole() {
    let json = r#"{"shape": "__tuple__((28, 28))"}"#;

    let config = apply(json, &["--shape", "32", "64"]).unwrap();
    assert_eq!(
        config.get("shape").unwrap(),
        &Value::Tuple(vec![Value::Int(32), Value::Int(64)])
    );

    // no element flags exist for tuples
    let config = apply(json, &["--shape.0", "5"]).unwrap();
    assert_eq!(config, tree(json));
}
