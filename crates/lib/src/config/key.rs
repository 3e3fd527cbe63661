//! Mapping keys.
//!
//! Most keys are text, but a node can also be keyed by numbers (diff results,
//! loaded documents with `__int__` keys) or by references (the type-keyed
//! mappings consumed by `init_objects`).

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use indexmap::Equivalent;

use crate::codec::{FunctionRef, ModuleRef, TypeRef};

/// A key in a [`Config`](super::Config) node.
///
/// Text keys hash exactly like `str`, so nodes can be queried with plain
/// string slices:
///
/// ```
/// use paramtree::config::{Config, Key};
///
/// let mut config = Config::new();
/// config.insert(Key::Int(1), "one");
/// config.insert("name", "two");
///
/// assert!(config.get("name").is_some());
/// assert!(config.get_key(&Key::Int(1)).is_some());
/// assert!(config.get("1").is_none());
/// ```
#[derive(Clone, Debug)]
pub enum Key {
    Text(String),
    Int(i64),
    Float(f64),
    Type(TypeRef),
    Function(FunctionRef),
    Module(ModuleRef),
}

impl Key {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Key::Text(_))
    }

    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Key::Type(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Text(a), Key::Text(b)) => a == b,
            (Key::Int(a), Key::Int(b)) => a == b,
            (Key::Float(a), Key::Float(b)) => a.to_bits() == b.to_bits(),
            (Key::Type(a), Key::Type(b)) => a == b,
            (Key::Function(a), Key::Function(b)) => a == b,
            (Key::Module(a), Key::Module(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            // must match `str::hash` for the `Equivalent` lookup below
            Key::Text(s) => s.as_str().hash(state),
            Key::Int(n) => {
                state.write_u8(1);
                n.hash(state);
            }
            Key::Float(f) => {
                state.write_u8(2);
                f.to_bits().hash(state);
            }
            Key::Type(t) => {
                state.write_u8(3);
                t.hash(state);
            }
            Key::Function(f) => {
                state.write_u8(4);
                f.hash(state);
            }
            Key::Module(m) => {
                state.write_u8(5);
                m.hash(state);
            }
        }
    }
}

impl Equivalent<Key> for str {
    fn equivalent(&self, key: &Key) -> bool {
        matches!(key, Key::Text(s) if s == self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(s) => f.write_str(s),
            Key::Int(n) => write!(f, "{n}"),
            Key::Float(x) => write!(f, "{x:?}"),
            Key::Type(t) => f.write_str(&t.qualified_name()),
            Key::Function(func) => f.write_str(&func.qualified_name()),
            Key::Module(m) => f.write_str(m.name()),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Text(s.clone())
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<f64> for Key {
    fn from(f: f64) -> Self {
        Key::Float(f)
    }
}

impl From<TypeRef> for Key {
    fn from(t: TypeRef) -> Self {
        Key::Type(t)
    }
}

impl From<FunctionRef> for Key {
    fn from(f: FunctionRef) -> Self {
        Key::Function(f)
    }
}

impl From<ModuleRef> for Key {
    fn from(m: ModuleRef) -> Self {
        Key::Module(m)
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_text_key_hashes_like_str() {
        assert_eq!(hash_of(&Key::from("lr")), hash_of("lr"));
        assert_ne!(Key::Int(1), Key::from("1"));
    }

    #[test]
    fn test_float_keys_compare_by_bits() {
        assert_eq!(Key::Float(0.5), Key::Float(0.5));
        assert_eq!(Key::Float(f64::NAN), Key::Float(f64::NAN));
        assert_eq!(hash_of(&Key::Float(0.5)), hash_of(&Key::Float(0.5)));
    }
}
