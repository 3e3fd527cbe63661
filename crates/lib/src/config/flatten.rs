//! Projection of a tree onto single-level dotted keys.

use indexmap::IndexMap;

use super::{Config, ConfigError, Key, Value, path};

/// A flattened tree: dotted text keys mapped to leaf values.
pub type FlatConfig = IndexMap<Key, Value>;

/// How sequences are treated by [`Config::flatten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Emit each sequence whole at its own key, next to its expanded elements
    pub keep_lists: bool,
    /// Sequences longer than this are never expanded and always kept whole;
    /// `None` expands every sequence
    pub max_split_size: Option<usize>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            keep_lists: true,
            max_split_size: Some(10),
        }
    }
}

impl FlattenOptions {
    pub fn keep_lists(mut self, keep_lists: bool) -> Self {
        self.keep_lists = keep_lists;
        self
    }

    pub fn max_split_size(mut self, max_split_size: Option<usize>) -> Self {
        self.max_split_size = max_split_size;
        self
    }
}

impl Config {
    /// Flattens the tree to dotted keys.
    ///
    /// Nested nodes are re-prefixed with their key; non-text keys found in a
    /// nested node are gathered into a node kept at the parent key.
    /// Sequences within `max_split_size` expand to `key.<index>` entries.
    ///
    /// ```
    /// use paramtree::config::{Config, FlattenOptions, Value};
    ///
    /// let mut config = Config::new();
    /// config.set("a", vec![1, 2, 3]).unwrap();
    ///
    /// let flat = config.flatten(FlattenOptions::default());
    /// let keys: Vec<_> = flat.keys().map(ToString::to_string).collect();
    /// assert_eq!(keys, ["a", "a.0", "a.1", "a.2"]);
    ///
    /// let flat = config.flatten(FlattenOptions::default().keep_lists(false));
    /// assert!(flat.get("a").is_none());
    /// assert_eq!(flat.get("a.2"), Some(&Value::Int(3)));
    /// ```
    pub fn flatten(&self, options: FlattenOptions) -> FlatConfig {
        let mut out = FlatConfig::new();
        for (key, value) in self.iter() {
            match (key, value) {
                (Key::Text(prefix), Value::Config(child)) => {
                    let mut intermediate = Config::new();
                    for (sub_key, sub_value) in child.flatten(options) {
                        match sub_key {
                            Key::Text(sub) => {
                                out.insert(Key::Text(path::join(prefix, &sub)), sub_value);
                            }
                            other => {
                                intermediate.insert(other, sub_value);
                            }
                        }
                    }
                    if !intermediate.is_empty() {
                        out.insert(key.clone(), Value::Config(intermediate));
                    }
                }
                (_, Value::List(items) | Value::Tuple(items)) => {
                    let within = options
                        .max_split_size
                        .is_none_or(|max| items.len() <= max);
                    if options.keep_lists || !key.is_text() || !within {
                        out.insert(key.clone(), value.clone());
                    }
                    if let (true, Key::Text(prefix)) = (within, key) {
                        for (i, item) in items.iter().enumerate() {
                            out.insert(Key::Text(path::join(prefix, &i.to_string())), item.clone());
                        }
                    }
                }
                _ => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }
        out
    }

    /// Rebuilds a tree from dotted keys by setting each one in order.
    ///
    /// Index keys land in the sequence kept at their parent key when there is
    /// one, and in a nested node otherwise.
    pub fn unflatten(flat: &FlatConfig) -> Result<Config, ConfigError> {
        let mut config = Config::new();
        for (key, value) in flat {
            match key {
                Key::Text(dotted) => config.set(dotted, value.clone())?,
                other => {
                    config.insert(other.clone(), value.clone());
                }
            }
        }
        Ok(config)
    }

    /// Renders the flattened tree as `--key value` pairs separated by two spaces.
    ///
    /// ```
    /// use paramtree::config::Config;
    ///
    /// let mut config = Config::new();
    /// config.set("lr", 0.5).unwrap();
    /// config.set("net.sizes", vec![2, 4]).unwrap();
    ///
    /// assert_eq!(
    ///     config.to_cmd_args(),
    ///     "--lr 0.5  --net.sizes 2 4  --net.sizes.0 2  --net.sizes.1 4"
    /// );
    /// ```
    pub fn to_cmd_args(&self) -> String {
        self.flatten(FlattenOptions::default())
            .iter()
            .map(|(key, value)| {
                let rendered = match value.as_list() {
                    Some(items) => items
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" "),
                    None => value.to_string(),
                };
                format!("--{key} {rendered}")
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}
