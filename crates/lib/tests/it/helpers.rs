use paramtree::{Config, Value, codec::Registry};

/// Parses a JSON fragment into a fresh tree, panicking on malformed input.
pub fn tree(json: &str) -> Config {
    tree_with(json, &Registry::new())
}

pub fn tree_with(json: &str, registry: &Registry) -> Config {
    let mut config = Config::new();
    config
        .loads_with(json, registry)
        .unwrap_or_else(|e| panic!("bad test fixture {json}: {e}"));
    config
}

/// Registry with a few references used across tests.
pub fn test_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_type("layers", "Linear");
    registry.register_type("layers", "Conv");
    registry.register_function("ops", "double", |args: &[Value]| {
        let n = args.first().and_then(Value::as_int).ok_or("expected an int")?;
        Ok(Value::Int(n * 2))
    });
    registry.register_module("numpy");
    registry
}
