//! Structural difference across any number of trees.

use serde_json::Value as Json;

use super::{Config, Key, Value};
use crate::codec;

impl Config {
    /// Differences between `self` and `others`, see [`Config::diff_static`].
    pub fn diff(&self, others: &[&Config], only_set: bool) -> Config {
        let mut all = Vec::with_capacity(others.len() + 1);
        all.push(self);
        all.extend_from_slice(others);
        Config::diff_static(&all, only_set)
    }

    /// Collects every key whose values differ between the given trees.
    ///
    /// Values are compared through their canonical encoding. A key missing
    /// from any tree always differs and shows up as null in that position,
    /// even next to an explicit null. Where every tree holds a nested node the
    /// diff recurses, otherwise the key maps to a tuple of the raw values in
    /// input order, or with `only_set` to the distinct canonical values in
    /// first-seen order.
    ///
    /// ```
    /// use paramtree::config::{Config, Value};
    ///
    /// let a: Config = [("x", 1), ("y", 2)].into_iter().collect();
    /// let b: Config = [("x", 1), ("y", 3)].into_iter().collect();
    ///
    /// let diff = Config::diff_static(&[&a, &b], false);
    /// assert_eq!(diff.len(), 1);
    /// assert_eq!(
    ///     diff.get("y").unwrap(),
    ///     &Value::Tuple(vec![Value::Int(2), Value::Int(3)])
    /// );
    /// ```
    pub fn diff_static(configs: &[&Config], only_set: bool) -> Config {
        let mut keys: Vec<&Key> = Vec::new();
        for config in configs {
            for key in config.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        let mut difference = Config::new();
        for key in keys {
            let raw: Vec<Option<&Value>> = configs.iter().map(|c| c.get_key(key)).collect();
            let encoded: Vec<Json> = raw
                .iter()
                .map(|value| value.map_or(Json::Null, codec::canonical))
                .collect();

            let present_everywhere = raw.iter().all(Option::is_some);
            if present_everywhere && encoded.windows(2).all(|pair| pair[0] == pair[1]) {
                continue;
            }

            let nested: Option<Vec<&Config>> = raw
                .iter()
                .map(|value| value.and_then(Value::as_config))
                .collect();
            let entry = match nested {
                Some(children) => Value::Config(Config::diff_static(&children, only_set)),
                None if only_set => {
                    let mut distinct: Vec<Json> = Vec::new();
                    for value in encoded {
                        if !distinct.contains(&value) {
                            distinct.push(value);
                        }
                    }
                    Value::Tuple(distinct.iter().map(structural).collect())
                }
                None => Value::Tuple(raw.into_iter().map(|v| v.cloned().unwrap_or_default()).collect()),
            };
            difference.insert(key.clone(), entry);
        }
        difference
    }
}

/// Lifts a canonical JSON value back into a [`Value`] without resolving tags.
fn structural(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(structural).collect()),
        Json::Object(map) => Value::Config(
            map.iter()
                .map(|(key, value)| (key.as_str(), structural(value)))
                .collect(),
        ),
    }
}
