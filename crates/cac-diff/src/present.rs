//! Present-at-source pruning

use cac_patch::Tree;
use serde_json::Value;

/// Remove every key of `target` that `source` does not have. A missing or
/// non-object `source` clears `target`.
pub fn only_present_keys(source: Option<&Value>, target: &mut Tree) {
    let Some(Value::Object(source)) = source else {
        target.clear();
        return;
    };

    let absent: Vec<String> = target
        .keys()
        .filter(|key| !source.contains_key(*key))
        .cloned()
        .collect();
    for key in absent {
        target.remove(&key);
    }
}

/// Restrict `target` to what `source` manages: top-level keys absent from
/// `source` go, and so do the immediate children of object sections that
/// `source` lacks.
///
/// Pruning stops there. Deeper keys present only in `target` still show up
/// as additions.
pub fn prune_to_source(source: &Tree, target: &mut Tree) {
    let absent: Vec<String> = target
        .keys()
        .filter(|key| !source.contains_key(*key))
        .cloned()
        .collect();
    for key in absent {
        target.remove(&key);
    }

    for (key, value) in target.iter_mut() {
        if let Value::Object(children) = value {
            only_present_keys(source.get(key), children);
        }
    }
}
