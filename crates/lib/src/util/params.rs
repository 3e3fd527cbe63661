//! Copying named parameters between two collections.

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::warn;

/// Names that did not line up during [`merge_named`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// In the update but not in the target
    pub unused: Vec<String>,
    /// In the target but not in the update
    pub not_updated: Vec<String>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.unused.is_empty() && self.not_updated.is_empty()
    }
}

/// Copies every entry of `update` whose name is also in `target`, except
/// the names in `exclude`.
///
/// Mismatched names are logged and returned; nothing is inserted into
/// `target` that was not already there.
///
/// ```
/// use indexmap::IndexMap;
/// use paramtree::util::params::merge_named;
///
/// let mut weights: IndexMap<String, f32> =
///     [("conv.weight".into(), 0.0), ("fc.bias".into(), 0.0)].into_iter().collect();
/// let trained: IndexMap<String, f32> =
///     [("conv.weight".into(), 1.5), ("head.bias".into(), 2.0)].into_iter().collect();
///
/// let report = merge_named(&mut weights, &trained, &[]);
/// assert_eq!(weights["conv.weight"], 1.5);
/// assert_eq!(report.unused, ["head.bias"]);
/// assert_eq!(report.not_updated, ["fc.bias"]);
/// ```
pub fn merge_named<K, V>(
    target: &mut IndexMap<K, V>,
    update: &IndexMap<K, V>,
    exclude: &[&str],
) -> MergeReport
where
    K: AsRef<str> + Hash + Eq,
    V: Clone,
{
    let excluded = |name: &K| exclude.contains(&name.as_ref());

    let unused: Vec<String> = update
        .keys()
        .filter(|name| !excluded(name) && !target.contains_key(*name))
        .map(|name| name.as_ref().to_string())
        .collect();
    let not_updated: Vec<String> = target
        .keys()
        .filter(|name| !excluded(name) && !update.contains_key(*name))
        .map(|name| name.as_ref().to_string())
        .collect();

    if !unused.is_empty() {
        warn!(names = ?unused, "Parameters in the update have no match in the target");
    }
    if !not_updated.is_empty() {
        warn!(names = ?not_updated, "Parameters in the target were not updated");
    }

    for (name, value) in update {
        if excluded(name) {
            continue;
        }
        if let Some(slot) = target.get_mut(name) {
            *slot = value.clone();
        }
    }

    MergeReport {
        unused,
        not_updated,
    }
}
