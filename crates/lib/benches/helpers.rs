//! Shared helpers for benchmark tests

use paramtree::{Config, Value};

/// Builds a tree `depth` levels deep with `width` children per node.
///
/// Leaves cycle through ints, floats, text and short lists so every
/// flatten and encode path is exercised.
pub fn generated_tree(depth: usize, width: usize) -> Config {
    let mut config = Config::new();
    for i in 0..width {
        let key = format!("node_{i}");
        if depth > 1 {
            config.insert(key, generated_tree(depth - 1, width));
        } else {
            config.insert(key, leaf(i));
        }
    }
    config
}

fn leaf(i: usize) -> Value {
    match i % 4 {
        0 => Value::Int(i as i64),
        1 => Value::Float(i as f64 / 3.0),
        2 => Value::from(format!("value_{i}")),
        _ => Value::from(vec![i as i64, i as i64 + 1, i as i64 + 2]),
    }
}

/// A copy of `config` with every `stride`-th flattened leaf changed.
pub fn perturbed(config: &Config, stride: usize) -> Config {
    let mut changed = config.clone();
    let keys: Vec<String> = config
        .flatten(Default::default())
        .into_iter()
        .filter_map(|(key, value)| (!value.is_mapping()).then(|| key.to_string()))
        .filter(|key| !key.rsplit('.').next().is_some_and(|last| last.parse::<usize>().is_ok()))
        .collect();
    for key in keys.iter().step_by(stride.max(1)) {
        // Every flattened key here is addressable
        let _ = changed.set(key, "changed");
    }
    changed
}
