//! Merging one tree into another.
//!
//! All merges apply key by key in the source's order and mutate `self` in
//! place. Keys listed in an ignore set are skipped at the top level only.
//! A text key containing `.` in the source is a path: it merges as the
//! nested node it names.

use super::{Config, Key, Value};

fn ignored(key: &Key, ignore: &[&str]) -> bool {
    key.as_text().is_some_and(|text| ignore.contains(&text))
}

/// Rewrites `"a.b": v` as `{"a": {"b": v}}`. Deeper paths stay dotted in the
/// inner node and unfold when it is merged in turn.
fn unfold(key: &Key, value: &Value) -> Option<Config> {
    let (head, rest) = key.as_text()?.split_once('.')?;
    if head.is_empty() || rest.is_empty() {
        return None;
    }
    let mut inner = Config::new();
    inner.insert(rest, value.clone());
    let mut outer = Config::new();
    outer.insert(head, Value::Config(inner));
    Some(outer)
}

impl Config {
    /// Shallow update: an incoming mapping is merged into an existing node
    /// under the same key; everything else overwrites.
    ///
    /// ```
    /// use paramtree::config::Config;
    ///
    /// let mut config = Config::new();
    /// config.set("net.depth", 4).unwrap();
    /// config.set("net.width", 8).unwrap();
    ///
    /// let mut source = Config::new();
    /// source.set("net.width", 16).unwrap();
    /// source.set("seed", 1).unwrap();
    /// config.update(&source);
    ///
    /// assert_eq!(config.get("net.depth").unwrap(), &4);
    /// assert_eq!(config.get("net.width").unwrap(), &16);
    /// assert_eq!(config.get("seed").unwrap(), &1);
    /// ```
    pub fn update(&mut self, source: &Config) {
        self.update_ignoring(source, &[]);
    }

    /// [`update`](Self::update) skipping the given top-level keys.
    pub fn update_ignoring(&mut self, source: &Config, ignore: &[&str]) {
        for (key, value) in source.iter() {
            if ignored(key, ignore) {
                continue;
            }
            if let Some(nested) = unfold(key, value) {
                self.update(&nested);
                continue;
            }
            match (self.get_key_mut(key), value) {
                (Some(Value::Config(existing)), Value::Config(incoming)) => {
                    existing.update(incoming);
                }
                _ => {
                    self.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Deep update: every incoming node and sequence is rebuilt into fresh
    /// storage, and incoming mappings merge recursively into existing nodes.
    ///
    /// Nothing in `self` shares storage with `source` afterwards.
    pub fn deepupdate(&mut self, source: &Config) {
        self.deepupdate_ignoring(source, &[]);
    }

    /// [`deepupdate`](Self::deepupdate) skipping the given top-level keys.
    pub fn deepupdate_ignoring(&mut self, source: &Config, ignore: &[&str]) {
        for (key, value) in source.iter() {
            if ignored(key, ignore) {
                continue;
            }
            if let Some(nested) = unfold(key, value) {
                self.deepupdate(&nested);
                continue;
            }
            match (self.get_key_mut(key), value) {
                (Some(Value::Config(existing)), Value::Config(incoming)) => {
                    existing.deepupdate(incoming);
                }
                _ => {
                    self.insert(key.clone(), value.materialize());
                }
            }
        }
    }

    /// Fills keys missing from `self`, never overwriting an existing leaf.
    pub fn update_missing(&mut self, source: &Config) {
        for (key, value) in source.iter() {
            if let Some(nested) = unfold(key, value) {
                self.update_missing(&nested);
                continue;
            }
            match (self.get_key_mut(key), value) {
                (None, _) => {
                    self.insert(key.clone(), value.clone());
                }
                (Some(Value::Config(existing)), Value::Config(incoming)) => {
                    existing.update_missing(incoming);
                }
                _ => {}
            }
        }
    }

    /// Structural subset test: every key of `other` is present in `self` with
    /// an equal value, recursing into nested nodes.
    pub fn contains(&self, other: &Config) -> bool {
        other.iter().all(|(key, value)| match (self.get_key(key), value) {
            (None, _) => false,
            (Some(Value::Config(mine)), Value::Config(theirs)) => mine.contains(theirs),
            (Some(_), Value::Config(_)) => false,
            (Some(mine), theirs) => mine == theirs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(pairs: &[(&str, Value)]) -> Config {
        let mut config = Config::new();
        for (path, value) in pairs {
            config.set(path, value.clone()).unwrap();
        }
        config
    }

    #[test]
    fn test_deepupdate_merges_nested_nodes() {
        let mut target = tree(&[("a", 1.into()), ("b.x", 2.into())]);
        let source = tree(&[("b.y", 3.into())]);
        target.deepupdate(&source);
        assert_eq!(target, tree(&[("a", 1.into()), ("b.x", 2.into()), ("b.y", 3.into())]));
    }

    #[test]
    fn test_deepupdate_replaces_leaves_with_nodes() {
        let mut target = tree(&[("b", 1.into())]);
        target.deepupdate(&tree(&[("b.c", 2.into())]));
        assert_eq!(target.get("b.c").unwrap(), &2);
    }

    #[test]
    fn test_update_ignores_top_level_keys_only() {
        let mut target = Config::new();
        let source = tree(&[("skip", 1.into()), ("keep.skip", 2.into())]);
        target.update_ignoring(&source, &["skip"]);
        assert!(target.get("skip").is_none());
        assert_eq!(target.get("keep.skip").unwrap(), &2);
    }

    #[test]
    fn test_update_missing_never_overwrites() {
        let mut target = tree(&[("a", 1.into()), ("n.x", 1.into())]);
        let source = tree(&[("a", 9.into()), ("n.x", 9.into()), ("n.y", 9.into()), ("b", 9.into())]);
        target.update_missing(&source);
        assert_eq!(target.get("a").unwrap(), &1);
        assert_eq!(target.get("n.x").unwrap(), &1);
        assert_eq!(target.get("n.y").unwrap(), &9);
        assert_eq!(target.get("b").unwrap(), &9);
    }

    #[test]
    fn test_contains() {
        let whole = tree(&[("a", 1.into()), ("n.x", 2.into()), ("n.y", 3.into())]);
        assert!(whole.contains(&tree(&[("n.x", 2.into())])));
        assert!(whole.contains(&Config::new()));
        assert!(!whole.contains(&tree(&[("n.x", 3.into())])));
        assert!(!whole.contains(&tree(&[("a.x", 1.into())])));
        assert!(!whole.contains(&tree(&[("missing", 1.into())])));
    }

    #[test]
    fn test_dotted_source_keys_merge_as_paths() {
        let mut source = Config::new();
        source.insert("n.x", 5);
        source.insert("n.deep.y", 6);

        let mut target = tree(&[("n.x", 1.into()), ("n.z", 2.into())]);
        target.update(&source);
        assert_eq!(target.get("n.x").unwrap(), &5);
        assert_eq!(target.get("n.z").unwrap(), &2);
        assert_eq!(target.get("n.deep.y").unwrap(), &6);
        assert!(target.get_literal("n.x").is_none());

        let mut deep = Config::new();
        deep.deepupdate(&source);
        assert_eq!(deep.keys().count(), 1);
        assert_eq!(deep.get("n.deep.y").unwrap(), &6);

        let mut missing = tree(&[("n.x", 1.into())]);
        missing.update_missing(&source);
        assert_eq!(missing.get("n.x").unwrap(), &1);
        assert_eq!(missing.get("n.deep.y").unwrap(), &6);
    }
}
