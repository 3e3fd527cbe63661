//! Values stored in a config tree.
//!
//! A [`Value`] is either a leaf (primitives and the reference kinds), a
//! sequence (`List` or `Tuple`) or a nested [`Config`] node. Nested mappings
//! are always materialized as `Config`, so dotted access and merging apply
//! uniformly throughout a tree.

use std::fmt;

use super::Config;
use crate::codec::{self, FunctionRef, Instance, ModuleRef, TypeRef, literal};

/// Values that can be stored in a [`Config`].
///
/// `Value` compares directly with primitives:
///
/// ```
/// # use paramtree::config::Value;
/// let text = Value::from("adam");
/// let number = Value::Int(3);
///
/// assert!(text == "adam");
/// assert!(number == 3);
/// assert!(!(number == "3"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null/absent value
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),

    /// Ordered, possibly heterogeneous sequence
    List(Vec<Value>),
    /// Immutable sequence, serialized with the `__tuple__` tag
    Tuple(Vec<Value>),
    /// Nested node
    Config(Config),

    /// Reference to a registered type
    Type(TypeRef),
    /// Reference to a registered callable
    Function(FunctionRef),
    /// Reference to a registered module
    Module(ModuleRef),
    /// Object built by `init_objects`
    Instance(Instance),
}

impl Value {
    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Config(_) => "config",
            Value::Type(_) => "type",
            Value::Function(_) => "function",
            Value::Module(_) => "module",
            Value::Instance(_) => "instance",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for nested nodes
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Config(_))
    }

    /// Returns true for lists and tuples
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_) | Value::Tuple(_))
    }

    /// Returns true for type, function and module references
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Type(_) | Value::Function(_) | Value::Module(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a list or tuple
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_config(&self) -> Option<&Config> {
        match self {
            Value::Config(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_config_mut(&mut self) -> Option<&mut Config> {
        match self {
            Value::Config(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Rebuilds every nested node and sequence into fresh storage.
    pub(crate) fn materialize(&self) -> Value {
        match self {
            Value::List(items) => Value::List(items.iter().map(Value::materialize).collect()),
            Value::Tuple(items) => Value::Tuple(items.iter().map(Value::materialize).collect()),
            Value::Config(config) => {
                let mut fresh = Config::new();
                for (key, value) in config.iter() {
                    fresh.insert(key.clone(), value.materialize());
                }
                Value::Config(fresh)
            }
            leaf => leaf.clone(),
        }
    }
}

/// Command-line style rendering: text is written bare, `None`/`True`/`False`
/// for the singletons, sequences in literal form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Text(s) => f.write_str(s),
            Value::List(_) | Value::Tuple(_) | Value::Config(_) => {
                // references inside a sequence fall back to their wire form
                match literal::repr(self) {
                    Ok(repr) => f.write_str(&repr),
                    Err(_) => write!(f, "{}", codec::canonical(self)),
                }
            }
            Value::Type(t) => f.write_str(&t.qualified_name()),
            Value::Function(func) => f.write_str(&func.qualified_name()),
            Value::Module(m) => f.write_str(m.name()),
            Value::Instance(instance) => write!(
                f,
                "<{} at {:#x}>",
                instance.type_ref().qualified_name(),
                instance.address()
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Config> for Value {
    fn from(value: Config) -> Self {
        Value::Config(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<TypeRef> for Value {
    fn from(value: TypeRef) -> Self {
        Value::Type(value)
    }
}

impl From<FunctionRef> for Value {
    fn from(value: FunctionRef) -> Self {
        Value::Function(value)
    }
}

impl From<ModuleRef> for Value {
    fn from(value: ModuleRef) -> Self {
        Value::Module(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Instance(value)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_int() == Some(*other as i64)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(f) if f == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialize_detaches_storage() {
        let mut inner = Config::new();
        inner.insert("x", vec![1, 2]);
        let original = Value::Config(inner);

        let mut copy = original.materialize();
        copy.as_config_mut()
            .unwrap()
            .get_mut("x")
            .unwrap()
            .as_list_mut()
            .unwrap()
            .push(Value::Int(3));

        assert_eq!(original.as_config().unwrap().get("x").unwrap().as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_display_for_command_lines() {
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn test_sequences_share_accessors() {
        let tuple = Value::Tuple(vec![Value::Int(1)]);
        assert!(tuple.is_sequence());
        assert_eq!(tuple.as_list(), Some(&[Value::Int(1)][..]));
        assert_ne!(tuple, Value::List(vec![Value::Int(1)]));
    }
}
