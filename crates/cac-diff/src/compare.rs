//! Structural comparison of two trees

use std::collections::BTreeSet;

use serde_json::Value;

use crate::path::FieldPath;
use crate::rules::FieldRules;

/// A difference between source and target at one path.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Present only in the target
    Added { path: FieldPath, value: Value },
    /// Present only in the source
    Removed { path: FieldPath, value: Value },
    Modified {
        path: FieldPath,
        old: Value,
        new: Value,
    },
}

impl Change {
    pub fn path(&self) -> &FieldPath {
        match self {
            Change::Added { path, .. }
            | Change::Removed { path, .. }
            | Change::Modified { path, .. } => path,
        }
    }
}

/// Compares values while skipping every path matched by one of its rules.
#[derive(Debug, Default)]
pub struct Comparer<'a> {
    rules: Vec<&'a FieldRules>,
}

impl<'a> Comparer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, rules: &'a FieldRules) -> Self {
        self.rules.push(rules);
        self
    }

    pub fn is_ignored(&self, path: &FieldPath) -> bool {
        self.rules.iter().any(|rules| rules.matches(path))
    }

    /// Every change turning `source` into `target`, in path order.
    pub fn compare(&self, source: &Value, target: &Value) -> Vec<Change> {
        let mut changes = Vec::new();
        self.diff_values(source, target, &FieldPath::root(), &mut changes);
        changes
    }

    fn diff_values(&self, source: &Value, target: &Value, path: &FieldPath, changes: &mut Vec<Change>) {
        if self.is_ignored(path) {
            return;
        }

        match (source, target) {
            (Value::Object(old), Value::Object(new)) => {
                let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
                for key in keys {
                    let child = path.key(key);
                    if self.is_ignored(&child) {
                        continue;
                    }

                    match (old.get(key), new.get(key)) {
                        (Some(old), Some(new)) => self.diff_values(old, new, &child, changes),
                        (Some(old), None) => changes.push(Change::Removed {
                            value: self.redact(old, &child),
                            path: child,
                        }),
                        (None, Some(new)) => changes.push(Change::Added {
                            value: self.redact(new, &child),
                            path: child,
                        }),
                        (None, None) => {}
                    }
                }
            }
            (Value::Array(old), Value::Array(new)) => self.diff_arrays(old, new, path, changes),
            _ => {
                let (old, new) = (self.redact(source, path), self.redact(target, path));
                if old != new {
                    changes.push(Change::Modified {
                        path: path.clone(),
                        old,
                        new,
                    });
                }
            }
        }
    }

    /// Arrays are multisets: only elements without an equal counterpart on
    /// the other side are reported.
    fn diff_arrays(&self, old: &[Value], new: &[Value], path: &FieldPath, changes: &mut Vec<Change>) {
        let element = path.element();
        if self.is_ignored(&element) {
            return;
        }

        let old: Vec<Value> = old.iter().map(|item| self.redact(item, &element)).collect();
        let mut unmatched: Vec<Option<Value>> = new
            .iter()
            .map(|item| Some(self.redact(item, &element)))
            .collect();

        let mut removed = Vec::new();
        for item in old {
            match unmatched.iter_mut().find(|candidate| candidate.as_ref() == Some(&item)) {
                Some(slot) => *slot = None,
                None => removed.push(item),
            }
        }

        for value in removed {
            changes.push(Change::Removed {
                path: element.clone(),
                value,
            });
        }
        for value in unmatched.into_iter().flatten() {
            changes.push(Change::Added {
                path: element.clone(),
                value,
            });
        }
    }

    /// A copy of `value` without the fields the rules exclude.
    fn redact(&self, value: &Value, path: &FieldPath) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter_map(|(key, item)| {
                        let child = path.key(key);
                        (!self.is_ignored(&child)).then(|| (key.clone(), self.redact(item, &child)))
                    })
                    .collect(),
            ),
            Value::Array(items) => {
                let element = path.element();
                Value::Array(items.iter().map(|item| self.redact(item, &element)).collect())
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn reports_added_removed_and_modified() {
        let changes = Comparer::new().compare(
            &json!({"a": 1, "b": 2, "gone": true}),
            &json!({"a": 1, "b": 3, "new": "x"}),
        );

        assert_eq!(
            changes,
            vec![
                Change::Modified {
                    path: FieldPath::root().key("b"),
                    old: json!(2),
                    new: json!(3)
                },
                Change::Removed {
                    path: FieldPath::root().key("gone"),
                    value: json!(true)
                },
                Change::Added {
                    path: FieldPath::root().key("new"),
                    value: json!("x")
                },
            ]
        );
    }

    #[test]
    fn arrays_ignore_order() {
        let changes = Comparer::new().compare(
            &json!({"uris": ["a", "b", "c"]}),
            &json!({"uris": ["c", "a", "b"]}),
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn arrays_report_unmatched_elements() {
        let changes = Comparer::new().compare(
            &json!({"uris": ["a", "a", "b"]}),
            &json!({"uris": ["a", "c"]}),
        );
        let element = FieldPath::root().key("uris").element();

        assert_eq!(
            changes,
            vec![
                Change::Removed { path: element.clone(), value: json!("a") },
                Change::Removed { path: element.clone(), value: json!("b") },
                Change::Added { path: element, value: json!("c") },
            ]
        );
    }

    #[test]
    fn type_changes_are_modifications() {
        let changes = Comparer::new().compare(&json!({"a": {"x": 1}}), &json!({"a": [1]}));
        assert!(matches!(changes.as_slice(), [Change::Modified { .. }]));
    }

    #[test]
    fn ignored_fields_are_skipped_and_redacted() {
        let secrets = FieldRules::secrets();
        let comparer = Comparer::new().ignore(secrets);

        let unchanged = comparer.compare(
            &json!({"clients": {"c": {"rotated_secrets": ["old"]}}}),
            &json!({"clients": {"c": {"rotated_secrets": ["new"]}}}),
        );
        assert!(unchanged.is_empty());

        let added = comparer.compare(
            &json!({"clients": {}}),
            &json!({"clients": {"c": {"name": "C", "rotated_secrets": ["s"]}}}),
        );
        assert_eq!(
            added,
            vec![Change::Added {
                path: FieldPath::root().key("clients").key("c"),
                value: json!({"name": "C"})
            }]
        );
    }
}
