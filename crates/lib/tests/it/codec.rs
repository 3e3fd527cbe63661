//! Persistence through the typed codec and the process-wide registry.

use paramtree::{
    Config, Key, Value,
    codec::{self, CodecError, CtorArgs, Registry},
    config::DumpOptions,
};

use crate::helpers::{test_registry, tree_with};

#[derive(Debug, PartialEq)]
struct Optimizer {
    name: String,
    lr: f64,
}

#[test]
fn test_global_registry_resolves_loaded_references() {
    Registry::with_global_mut(|registry| {
        registry.register_type_with("it_codec.optim", "Sgd", |args: CtorArgs| {
            let lr = args.named("lr").and_then(Value::as_float).ok_or("missing lr")?;
            Ok::<_, &str>(Optimizer {
                name: "sgd".into(),
                lr,
            })
        });
    });

    let mut config = Config::new();
    config
        .loads(r#""optimizer": {"__type__(it_codec.optim.Sgd)": {"lr": 0.05}}, "epochs": 3"#)
        .unwrap();

    let built = config.init_objects().unwrap();
    let built = built.as_config().unwrap();
    let optimizer = built.get("optimizer").and_then(Value::as_instance).unwrap();
    assert_eq!(optimizer.type_ref().qualified_name(), "it_codec.optim.Sgd");
    assert_eq!(
        optimizer.downcast_ref::<Optimizer>(),
        Some(&Optimizer {
            name: "sgd".into(),
            lr: 0.05
        })
    );
    assert_eq!(built.get("epochs").unwrap(), &3);
}

#[test]
fn test_unresolved_reference_aborts_load() {
    let mut config = Config::new();
    config.insert("kept", 1);
    let err = config
        .loads_with(r#"{"layer": "__type__(nowhere.Missing)"}"#, &Registry::new())
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(config.len(), 1);
}

#[test]
fn test_functions_survive_round_trip() {
    let registry = test_registry();
    let config = tree_with(r#"{"act": "__function__(ops.double)"}"#, &registry);
    let text = config.dumps(DumpOptions::default()).unwrap();
    assert!(text.contains("__function__(ops.double)"));

    let restored = tree_with(&text, &registry);
    let double = restored.get("act").and_then(Value::as_function).unwrap();
    assert_eq!(double.call(&[Value::Int(21)]).unwrap(), 42);
}

#[test]
fn test_tuple_literals_keep_strings_and_nesting() {
    let tuple = Value::Tuple(vec![
        Value::from("it's"),
        Value::Tuple(vec![Value::Int(1)]),
        Value::from(vec![Value::Null, Value::Bool(true)]),
        Value::Float(2.5),
    ]);
    let json = codec::encode(&tuple).unwrap();
    assert_eq!(json, "__tuple__((\"it's\", (1,), [None, True], 2.5))");

    let registry = Registry::new();
    assert_eq!(codec::Decoder::new(&registry).decode(&json).unwrap(), tuple);
}

#[test]
fn test_instances_cannot_be_dumped() {
    let mut registry = Registry::new();
    let unit = registry.register_type_with("it_codec", "Unit", |_| Ok::<_, &str>(()));
    let mut config = Config::new();
    config.insert("object", Value::Instance(unit.construct(CtorArgs::Empty).unwrap()));

    let err = config.dumps(DumpOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        paramtree::Error::Codec(CodecError::Unrepresentable { .. })
    ));
    // Display still renders a stand-in
    assert!(config.to_string().contains("__instance__("));
}

#[test]
fn test_serde_goes_through_the_codec() {
    let mut config = Config::new();
    config
        .set("data.shape", Value::Tuple(vec![Value::Int(28), Value::Int(28)]))
        .unwrap();
    config.insert(Key::Int(0), "zero");

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["data"]["shape"], "__tuple__((28, 28))");
    assert_eq!(json["__int__(0)"], "zero");

    let back: Config = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}
