//! Tree operations exercised through the public API.

use paramtree::{
    Config, Error, Key, Value,
    config::{ConfigError, DumpOptions, FlattenOptions, LoadPolicy},
};

use crate::helpers::{test_registry, tree, tree_with};

#[test]
fn test_deepupdate_merges_nested_nodes() {
    let mut config = tree(r#"{"a": 1, "b": {"x": 2}}"#);
    config.deepupdate(&tree(r#"{"b": {"y": 3}}"#));
    assert_eq!(config, tree(r#"{"a": 1, "b": {"x": 2, "y": 3}}"#));
}

#[test]
fn test_deepupdate_isolates_the_source() {
    let mut target = Config::new();
    let mut source = tree(r#"{"model": {"sizes": [1, 2], "head": {"width": 8}}}"#);
    target.deepupdate(&source);

    source.set("model.sizes.0", 100).unwrap();
    source.set("model.head.width", 64).unwrap();
    source
        .get_mut("model.sizes")
        .and_then(Value::as_list_mut)
        .unwrap()
        .push(Value::Int(3));

    assert_eq!(target.get("model.sizes").unwrap(), &Value::from(vec![1, 2]));
    assert_eq!(target.get("model.head.width").unwrap(), &8);
}

#[test]
fn test_update_missing_never_overwrites() {
    let mut target = tree(r#"{"lr": 0.1, "opt": {"name": "sgd"}}"#);
    target.update_missing(&tree(r#"{"lr": 0.5, "seed": 3, "opt": {"name": "adam", "beta": 0.9}}"#));
    assert_eq!(target.get("lr").unwrap(), &0.1);
    assert_eq!(target.get("seed").unwrap(), &3);
    assert_eq!(target.get("opt.name").unwrap(), &"sgd");
    assert_eq!(target.get("opt.beta").unwrap(), &0.9);
}

#[test]
fn test_flatten_lists() {
    let config = tree(r#"{"a": [1, 2, 3]}"#);

    let kept = config.flatten(FlattenOptions::default());
    let keys: Vec<String> = kept.keys().map(ToString::to_string).collect();
    assert_eq!(keys, ["a", "a.0", "a.1", "a.2"]);
    assert_eq!(kept["a"], Value::from(vec![1, 2, 3]));
    assert_eq!(kept["a.1"], 2);

    let split = config.flatten(FlattenOptions::default().keep_lists(false));
    assert!(split.get("a").is_none());
    assert_eq!(split.len(), 3);
    assert_eq!(split["a.2"], 3);
}

#[test]
fn test_diff_reports_differing_leaves() {
    let a = tree(r#"{"x": 1, "y": 2}"#);
    let b = tree(r#"{"x": 1, "y": 3}"#);
    let diff = Config::diff_static(&[&a, &b], false);
    assert_eq!(diff.len(), 1);
    assert_eq!(
        diff.get("y").unwrap(),
        &Value::Tuple(vec![Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn test_diff_is_empty_iff_mutual_containment() {
    let a = tree(r#"{"x": 1, "n": {"k": [1, 2]}}"#);
    let same = tree(r#"{"n": {"k": [1, 2]}, "x": 1}"#);
    let bigger = tree(r#"{"x": 1, "n": {"k": [1, 2], "extra": 5}}"#);
    let changed = tree(r#"{"x": 1, "n": {"k": [1, 3]}}"#);
    let nulled = tree(r#"{"x": 1, "n": {"k": [1, 2], "extra": null}}"#);

    for other in [&same, &bigger, &changed, &nulled] {
        let empty = Config::diff_static(&[&a, other], false).is_empty();
        assert_eq!(empty, a.contains(other) && other.contains(&a), "against {other}");
    }
}

#[test]
fn test_set_with_decode_types_values() {
    let mut config = Config::new();
    config.set_with_decode("a.b", "5", false).unwrap();
    assert_eq!(config, tree(r#"{"a": {"b": 5}}"#));

    let mut config = Config::new();
    config.set_with_decode("a.b", "5", true).unwrap();
    assert_eq!(config, tree(r#"{"a": {"b": "5"}}"#));

    config.set_from_string("a.c=[1, 2]", false).unwrap();
    assert_eq!(config.get("a.c").unwrap(), &Value::from(vec![1, 2]));
    assert!(matches!(
        config.set_from_string("a=b=c", false),
        Err(Error::Config(ConfigError::InvalidAssignment { .. }))
    ));
}

#[test]
fn test_path_errors() {
    let mut config = tree(r#"{"a": {"b": 1}, "list": [1, 2], "c": 2}"#);

    let err = config.try_get("a.missing").unwrap_err();
    assert!(err.is_not_found());
    assert!(config.try_get("list.x").unwrap_err().is_path_error());
    assert!(matches!(
        config.try_get("list.5"),
        Err(ConfigError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        config.set("a.b.c", 1),
        Err(ConfigError::NotAddressable { .. })
    ));
    assert!(matches!(config.try_get(""), Err(ConfigError::KeyRequired { len: 3 })));

    assert_eq!(config.get("list.-1").unwrap(), &2);
    config.set("list.0", "first").unwrap();
    assert_eq!(config.get("list.0").unwrap(), &"first");
}

#[test]
fn test_file_round_trip_preserves_special_values() {
    let registry = test_registry();
    let original = tree_with(
        r#"{
            "name": "run-1",
            "shape": "__tuple__((3, 224, 224))",
            "layer": "__type__(layers.Linear)",
            "act": "__function__(ops.double)",
            "backend": "__module__(numpy)",
            "__int__(7)": "seven",
            "__float__(0.5)": "half",
            "nested": {"ratios": [0.5, 1.0, 2.0], "flag": true, "none": null}
        }"#,
        &registry,
    );
    assert!(original.get("shape").unwrap().as_list().is_some());
    assert!(original.get_key(&Key::Int(7)).is_some());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    original.dump(&path, DumpOptions::default()).unwrap();

    let mut restored = Config::new();
    restored
        .load_with(&path, LoadPolicy::Strict, &registry)
        .unwrap();
    assert_eq!(restored, original);
    assert_eq!(
        restored.dumps(DumpOptions::sorted()).unwrap(),
        original.dumps(DumpOptions::sorted()).unwrap()
    );
}

#[test]
fn test_lenient_load_leaves_tree_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut config = tree(r#"{"kept": 1}"#);
    config.load(&path, LoadPolicy::Lenient).unwrap();
    assert_eq!(config, tree(r#"{"kept": 1}"#));

    let err = config.load(&path, LoadPolicy::Strict).unwrap_err();
    assert!(err.is_syntax_error());
}

#[test]
fn test_builder_layers_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("base.json");
    tree(r#"{"train": {"epochs": 10, "lr": 0.1}, "seed": 1}"#)
        .dump(&path, DumpOptions::default())
        .unwrap();

    let config = Config::builder()
        .file(&path)
        .config(tree(r#"{"train": {"lr": 0.01}}"#))
        .deep(true)
        .entry("seed", 42)
        .args(["--train.epochs", "20"])
        .build()
        .unwrap();

    assert_eq!(config, tree(r#"{"train": {"epochs": 20, "lr": 0.01}, "seed": 42}"#));
}

#[test]
fn test_to_cmd_args() {
    let config = tree(r#"{"a": {"b": 1}, "c": [1, 2]}"#);
    let rendered = config.to_cmd_args();
    assert!(rendered.contains("--a.b 1"));
    assert!(rendered.contains("--c 1 2"));
}

#[test]
fn test_loaded_dotted_keys_are_paths() {
    let config = tree(r#"{"model.depth": 4, "model": {"width": 8}}"#);
    assert_eq!(config, tree(r#"{"model": {"depth": 4, "width": 8}}"#));
    assert!(config.get_literal("model.depth").is_none());
}
