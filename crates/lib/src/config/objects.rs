//! Materializing type-keyed mappings into objects.

use tracing::debug;

use super::{Config, ConfigError, Key, Value};
use crate::codec::{CtorArgs, Registry, TypeRef};

impl Config {
    /// Returns a copy of the tree with every type-keyed mapping replaced by
    /// an instance of that type.
    ///
    /// The value under the type key supplies the constructor arguments: a
    /// node gives named arguments, a sequence positional ones, anything else
    /// none. Inner mappings are built first. The replaced mapping's other
    /// entries are discarded, and if `self` itself holds a type key the
    /// result is a single instance.
    ///
    /// Types are constructed with the constructor attached to the key, or
    /// failing that the one registered under the same name in the global
    /// registry.
    ///
    /// ```
    /// use paramtree::codec::{CtorArgs, Registry};
    /// use paramtree::config::Config;
    ///
    /// struct Dropout(f64);
    ///
    /// let mut registry = Registry::new();
    /// let dropout = registry.register_type_with("layers", "Dropout", |args: CtorArgs| {
    ///     let p = args.named("p").and_then(|p| p.as_float()).ok_or("missing p")?;
    ///     Ok::<_, &str>(Dropout(p))
    /// });
    ///
    /// let mut params = Config::new();
    /// params.insert("p", 0.25);
    /// let mut node = Config::new();
    /// node.insert(dropout, params);
    /// node.insert("comment", "discarded");
    ///
    /// let mut config = Config::new();
    /// config.insert("dropout", node);
    ///
    /// let built = config.init_objects_with(&registry).unwrap();
    /// let instance = built.as_config().unwrap().get("dropout").unwrap().as_instance().unwrap();
    /// assert_eq!(instance.downcast_ref::<Dropout>().unwrap().0, 0.25);
    /// ```
    pub fn init_objects(&self) -> Result<Value, ConfigError> {
        Registry::with_global(|registry| self.init_objects_with(registry))
    }

    /// [`init_objects`](Self::init_objects) with an explicit registry.
    pub fn init_objects_with(&self, registry: &Registry) -> Result<Value, ConfigError> {
        init_node(self, registry)
    }
}

fn init_node(node: &Config, registry: &Registry) -> Result<Value, ConfigError> {
    let mut built = Config::new();
    for (key, value) in node.iter() {
        if let Key::Type(type_ref) = key {
            let args = match init_value(value, registry)? {
                Value::Config(named) => CtorArgs::Named(named),
                Value::List(items) | Value::Tuple(items) => CtorArgs::Positional(items),
                _ => CtorArgs::Empty,
            };
            let constructor = constructible(type_ref, registry);
            debug!(type_name = %constructor.qualified_name(), "Constructing object from config");
            return constructor.construct(args).map(Value::Instance);
        }
        built.insert(key.clone(), init_value(value, registry)?);
    }
    Ok(Value::Config(built))
}

fn init_value(value: &Value, registry: &Registry) -> Result<Value, ConfigError> {
    Ok(match value {
        Value::Config(node) => init_node(node, registry)?,
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| init_value(item, registry))
                .collect::<Result<_, _>>()?,
        ),
        Value::Tuple(items) => Value::Tuple(
            items
                .iter()
                .map(|item| init_value(item, registry))
                .collect::<Result<_, _>>()?,
        ),
        leaf => leaf.clone(),
    })
}

fn constructible(type_ref: &TypeRef, registry: &Registry) -> TypeRef {
    if type_ref.is_constructible() {
        return type_ref.clone();
    }
    registry
        .resolve_type(&type_ref.qualified_name())
        .unwrap_or_else(|_| type_ref.clone())
}
