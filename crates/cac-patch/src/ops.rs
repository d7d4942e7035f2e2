//! Merge, filter and normalization operations on configuration trees

use chrono::{DateTime, SecondsFormat};
use serde_json::{Number, Value};

use crate::tree::Tree;

/// Fields copied from the remote representation that carry identity rather
/// than configuration.
pub const IDENTITY_FIELDS: &[&str] = &["id", "tenant_id"];

/// User-facing section names that differ from the key in the tree.
const SECTION_ALIASES: &[(&str, &str)] = &[
    ("scopes", "scopes_without_service"),
    ("ciba", "ciba_authentication_service"),
];

/// Apply `overlay` to `base` as an RFC 7396 JSON Merge Patch.
///
/// A non-object overlay replaces `base` entirely. An object overlay is applied
/// member by member: `null` removes the member, objects recurse, anything
/// else replaces.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match overlay {
        Value::Object(patch) => {
            let mut target = base.as_object().cloned().unwrap_or_default();
            merge_tree(&mut target, patch);
            Value::Object(target)
        }
        other => other.clone(),
    }
}

/// Apply `patch` to `target` in place as an RFC 7396 JSON Merge Patch.
pub fn merge_tree(target: &mut Tree, patch: &Tree) {
    for (key, value) in patch {
        match value {
            Value::Null => {
                target.remove(key);
            }
            Value::Object(nested) => {
                let entry = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Tree::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Tree::new());
                }
                if let Value::Object(map) = entry {
                    merge_tree(map, nested);
                }
            }
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

/// Map a user-facing section name to its key in the tree.
pub fn resolve_section_alias(name: &str) -> &str {
    SECTION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, key)| *key)
        .unwrap_or(name)
}

/// Keep only the requested top-level sections.
///
/// An empty `names` list keeps everything. Requested sections missing from
/// `tree` are omitted rather than added as `null`.
pub fn filter_patch<S: AsRef<str>>(tree: &Tree, names: &[S]) -> Tree {
    if names.is_empty() {
        return tree.clone();
    }

    let mut filtered = Tree::new();
    for name in names {
        let key = resolve_section_alias(name.as_ref());
        match tree.get(key) {
            Some(value) => {
                filtered.insert(key.to_string(), value.clone());
            }
            None => tracing::trace!(section = key, "requested section not present"),
        }
    }

    filtered
}

/// Remove identity fields that are round-trip artifacts of the remote
/// representation.
pub fn clean_patch(tree: &mut Tree) {
    for field in IDENTITY_FIELDS {
        tree.remove(*field);
    }
}

/// Rewrite `tree` into its canonical form.
///
/// Floats without a fractional part become integers and RFC 3339 timestamps
/// are rewritten in UTC, so values that mean the same thing compare equal.
pub fn normalize_patch(tree: &Tree) -> Tree {
    tree.iter()
        .map(|(key, value)| (key.clone(), canonicalize(value)))
        .collect()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(canonical_number(n)),
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(timestamp) => Value::String(
                timestamp
                    .to_utc()
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            Err(_) => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => Value::Object(normalize_patch(map)),
        Value::Null | Value::Bool(_) => value.clone(),
    }
}

fn canonical_number(n: &Number) -> Number {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            return Number::from(f as i64);
        }
    }
    n.clone()
}
