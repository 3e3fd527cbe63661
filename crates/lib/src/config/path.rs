//! Dotted-path resolution.
//!
//! A path such as `model.layers.0` is resolved left to right. The first
//! segment names a key in the current node. When the value under it is a
//! sequence, the *whole* remainder is read as an integer index (negative
//! indices count from the end); otherwise the remainder recurses into the
//! nested node. The empty key stands for the sole key of a single-entry node.
//!
//! ```
//! use paramtree::config::Config;
//!
//! let mut config = Config::new();
//! config.set("model.layers", vec![16, 32, 64]).unwrap();
//!
//! assert_eq!(config.get("model.layers.1").unwrap(), &32);
//! assert_eq!(config.get("model.layers.-1").unwrap(), &64);
//! assert!(config.try_get("model.layers.x").is_err());
//! ```

use super::{Config, ConfigError, Key, Value};

/// Splits off the first segment of a path.
pub fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Joins a prefix and a sub-key with the separator.
pub fn join(prefix: &str, key: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + key.len() + 1);
    joined.push_str(prefix);
    joined.push('.');
    joined.push_str(key);
    joined
}

fn index(full: &str, segment: &str, len: usize) -> Result<usize, ConfigError> {
    let index: i64 = segment.parse().map_err(|_| ConfigError::InvalidIndex {
        path: full.to_string(),
        index: segment.to_string(),
    })?;
    let resolved = if index < 0 {
        index + len as i64
    } else {
        index
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(ConfigError::IndexOutOfRange {
            path: full.to_string(),
            index,
            len,
        });
    }
    Ok(resolved as usize)
}

fn sole_key(node: &Config) -> Result<&Key, ConfigError> {
    match node.len() {
        1 => node
            .keys()
            .next()
            .ok_or(ConfigError::KeyRequired { len: 0 }),
        len => Err(ConfigError::KeyRequired { len }),
    }
}

fn lookup<'a>(node: &'a Config, head: &str, full: &str) -> Result<&'a Value, ConfigError> {
    if head.is_empty() {
        let key = sole_key(node)?;
        return node.get_key(key).ok_or(ConfigError::KeyRequired { len: node.len() });
    }
    node.get_literal(head).ok_or_else(|| ConfigError::KeyNotFound {
        key: full.to_string(),
    })
}

fn not_addressable(full: &str, segment: &str, found: &Value) -> ConfigError {
    ConfigError::NotAddressable {
        path: full.to_string(),
        segment: segment.to_string(),
        found: found.type_name(),
    }
}

/// Rewrites every empty segment as the sole key of the node it addresses.
pub(super) fn expand(node: &Config, path: &str) -> Result<String, ConfigError> {
    let mut current = Some(node);
    let mut segments = Vec::new();
    for segment in path.split('.') {
        let name = match (segment.is_empty(), current) {
            (false, _) => segment.to_string(),
            (true, Some(node)) => sole_key(node)?.to_string(),
            (true, None) => return Err(ConfigError::KeyRequired { len: 0 }),
        };
        current = current
            .and_then(|n| n.get_literal(&name))
            .and_then(Value::as_config);
        segments.push(name);
    }
    Ok(segments.join("."))
}

pub(super) fn resolve<'a>(node: &'a Config, path: &str) -> Result<&'a Value, ConfigError> {
    resolve_in(node, path, path)
}

fn resolve_in<'a>(node: &'a Config, path: &str, full: &str) -> Result<&'a Value, ConfigError> {
    let (head, rest) = split_first(path);
    let value = lookup(node, head, full)?;
    let Some(rest) = rest else {
        return Ok(value);
    };
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(&items[index(full, rest, items.len())?]),
        Value::Config(child) => resolve_in(child, rest, full),
        other => Err(not_addressable(full, head, other)),
    }
}

pub(super) fn resolve_mut<'a>(
    node: &'a mut Config,
    path: &str,
) -> Result<&'a mut Value, ConfigError> {
    resolve_mut_in(node, path, path)
}

fn resolve_mut_in<'a>(
    node: &'a mut Config,
    path: &str,
    full: &str,
) -> Result<&'a mut Value, ConfigError> {
    let (head, rest) = split_first(path);
    let key = if head.is_empty() {
        sole_key(node)?.clone()
    } else {
        Key::Text(head.to_string())
    };
    let value = node
        .get_key_mut(&key)
        .ok_or_else(|| ConfigError::KeyNotFound {
            key: full.to_string(),
        })?;
    let Some(rest) = rest else {
        return Ok(value);
    };
    match value {
        Value::List(items) | Value::Tuple(items) => {
            let i = index(full, rest, items.len())?;
            Ok(&mut items[i])
        }
        Value::Config(child) => resolve_mut_in(child, rest, full),
        other => Err(not_addressable(full, head, other)),
    }
}

pub(super) fn assign(node: &mut Config, path: &str, value: Value) -> Result<(), ConfigError> {
    assign_in(node, path, path, value)
}

fn assign_in(node: &mut Config, path: &str, full: &str, value: Value) -> Result<(), ConfigError> {
    let (head, rest) = split_first(path);
    let key = if head.is_empty() {
        sole_key(node)?.clone()
    } else {
        Key::Text(head.to_string())
    };
    let Some(rest) = rest else {
        node.insert(key, value);
        return Ok(());
    };
    let slot = node
        .entry(key)
        .or_insert_with(|| Value::Config(Config::new()));
    match slot {
        // sequences can be indexed but never grown through a path
        Value::List(items) => {
            let i = index(full, rest, items.len())?;
            items[i] = value;
            Ok(())
        }
        Value::Config(child) => assign_in(child, rest, full, value),
        other => Err(not_addressable(full, head, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut config = Config::new();
        config.set("a.b", 1).unwrap();
        config.set("a.c", vec![10, 20]).unwrap();
        config.insert("t", Value::Tuple(vec![Value::Int(5)]));
        config
    }

    #[test]
    fn test_split_first() {
        assert_eq!(split_first("a.b.c"), ("a", Some("b.c")));
        assert_eq!(split_first("a"), ("a", None));
        assert_eq!(split_first("a."), ("a", Some("")));
    }

    #[test]
    fn test_set_creates_intermediate_nodes() {
        let config = sample();
        assert!(config.get("a").unwrap().is_mapping());
        assert_eq!(config.get("a.b").unwrap(), &1);
    }

    #[test]
    fn test_index_resolution_is_terminal() {
        let config = sample();
        assert_eq!(config.get("a.c.0").unwrap(), &10);
        assert!(matches!(
            config.try_get("a.c.0.x"),
            Err(ConfigError::InvalidIndex { .. })
        ));
        assert!(matches!(
            config.try_get("a.c.2"),
            Err(ConfigError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
        assert_eq!(config.get("t.0").unwrap(), &5);
    }

    #[test]
    fn test_set_does_not_extend_sequences() {
        let mut config = sample();
        config.set("a.c.1", 99).unwrap();
        assert_eq!(config.get("a.c.1").unwrap(), &99);
        assert!(config.set("a.c.2", 1).is_err());
        // tuples are read-only through paths
        assert!(config.set("t.0", 1).is_err());
    }

    #[test]
    fn test_path_through_leaf_is_not_addressable() {
        let mut config = sample();
        let err = config.set("a.b.x", 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotAddressable { ref segment, found: "int", .. } if segment == "b"
        ));
        assert_eq!(err.path(), Some("a.b.x"));
    }

    #[test]
    fn test_empty_key_means_sole_key() {
        let mut config = Config::new();
        config.set("only.inner", 3).unwrap();
        assert_eq!(config.get(".inner").unwrap(), &3);
        assert!(config.get("").unwrap().is_mapping());

        config.set("", 4).unwrap();
        assert_eq!(config.get("only").unwrap(), &4);

        config.insert("second", 5);
        assert!(matches!(
            config.try_get(""),
            Err(ConfigError::KeyRequired { len: 2 })
        ));
    }

    #[test]
    fn test_expand_fills_empty_segments() {
        let config = sample();
        assert_eq!(expand(&config, "a.b").unwrap(), "a.b");
        let mut single = Config::new();
        single.set("only.inner", 1).unwrap();
        assert_eq!(expand(&single, "").unwrap(), "only");
        assert_eq!(expand(&single, ".inner").unwrap(), "only.inner");
        assert_eq!(expand(&single, "..").unwrap(), "only.inner");
        assert!(matches!(expand(&config, ""), Err(ConfigError::KeyRequired { len: 2 })));
        assert!(matches!(
            expand(&single, "only.inner."),
            Err(ConfigError::KeyRequired { len: 0 })
        ));
    }

    #[test]
    fn test_get_mut_reaches_list_elements() {
        let mut config = sample();
        *config.get_mut("a.c.-1").unwrap() = Value::Int(7);
        assert_eq!(config.get("a.c.1").unwrap(), &7);
    }
}
