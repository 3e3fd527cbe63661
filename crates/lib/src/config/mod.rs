//! Hierarchical configuration trees.
//!
//! A [`Config`] is an ordered mapping from [`Key`]s to [`Value`]s where every
//! nested mapping is itself a `Config`. Nodes are addressed with dotted paths
//! (see [`path`]), merged with [`Config::update`], [`Config::deepupdate`] and
//! [`Config::update_missing`], compared with [`Config::diff_static`], projected
//! to single-level keys with [`Config::flatten`], and persisted through the
//! typed codec with [`Config::dumps`] / [`Config::loads`].
//!
//! ```
//! use paramtree::config::Config;
//!
//! let mut defaults = Config::new();
//! defaults.set("optimizer.lr", 0.1).unwrap();
//! defaults.set("optimizer.momentum", 0.9).unwrap();
//!
//! let mut run = defaults.clone();
//! run.loads(r#""optimizer": {"lr": 0.01}"#).unwrap();
//!
//! assert_eq!(run.get("optimizer.lr").unwrap(), &0.01);
//! assert_eq!(run.get("optimizer.momentum").unwrap(), &0.9);
//!
//! let diff = Config::diff_static(&[&defaults, &run], false);
//! assert!(diff.get("optimizer.lr").is_some());
//! assert!(diff.get("optimizer.momentum").is_none());
//! ```

pub mod builder;
mod diff;
pub mod errors;
mod flatten;
mod io;
pub mod key;
mod merge;
mod objects;
pub mod path;
pub mod value;

use indexmap::{IndexMap, map::Entry};

pub use builder::ConfigBuilder;
pub use errors::ConfigError;
pub use flatten::{FlatConfig, FlattenOptions};
pub use io::{DumpOptions, LoadPolicy};
pub use key::Key;
pub use value::Value;

/// A node in a configuration tree.
///
/// Key order is insertion order and is preserved by every operation;
/// equality ignores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    children: IndexMap<Key, Value>,
}

impl Config {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a [`ConfigBuilder`].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, Key, Value> {
        self.children.iter_mut()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.children.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.children.values()
    }

    /// Looks up a dotted path, returning `None` if it does not resolve.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::resolve(self, path).ok()
    }

    /// Looks up a dotted path, reporting why it does not resolve.
    pub fn try_get(&self, path: &str) -> Result<&Value, ConfigError> {
        path::resolve(self, path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        path::resolve_mut(self, path).ok()
    }

    /// Sets a dotted path, creating intermediate nodes as needed.
    ///
    /// Sequence elements can be replaced but sequences are never extended.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        path::assign(self, path, value.into())
    }

    /// Looks up a literal text key without interpreting dots.
    pub fn get_literal(&self, key: &str) -> Option<&Value> {
        self.children.get(key)
    }

    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        self.children.get(key)
    }

    pub fn get_key_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.children.get_mut(key)
    }

    /// Returns true if the literal text key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Inserts under a literal key, returning the previous value.
    ///
    /// The key is never split, so flattened views can hold `"a.b"` as one
    /// entry. Use [`set`](Self::set) to address a path.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.children.insert(key.into(), value.into())
    }

    /// Removes a literal text key, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.children.shift_remove(key)
    }

    pub fn entry(&mut self, key: Key) -> Entry<'_, Key, Value> {
        self.children.entry(key)
    }

    /// Returns true if `key` is present and not null.
    pub fn has_non_null(&self, key: &str) -> bool {
        self.get_literal(key).is_some_and(|value| !value.is_null())
    }

    /// Sorts keys recursively by their encoded form.
    pub fn sort_keys(&mut self) {
        self.children
            .sort_by(|a, _, b, _| crate::codec::encode_key(a).cmp(&crate::codec::encode_key(b)));
        for value in self.children.values_mut() {
            if let Value::Config(child) = value {
                child.sort_keys();
            }
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            children: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for Config {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.children
            .extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
    }
}

impl IntoIterator for Config {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
