//! File-name normalization and per-section collision tracking

use std::collections::{HashMap, HashSet};

use crate::{Error, Result};

/// Characters that are replaced with `_` when turning a label into a file name.
const UNSAFE_CHARS: &[char] = &['/', ':', '*', '?', '"', '<', '>', '|', ' '];

/// Turn an arbitrary label into a filesystem-safe name.
///
/// Every character in `/ : * ? " < > |` and space becomes `_`. Empty labels
/// and labels starting with `.` are rejected.
pub fn normalize(label: &str) -> Result<String> {
    if label.is_empty() {
        return Err(Error::InvalidName {
            name: label.to_string(),
            reason: "file name cannot be empty".into(),
        });
    }

    if label.starts_with('.') {
        return Err(Error::InvalidName {
            name: label.to_string(),
            reason: "file name cannot start with a dot".into(),
        });
    }

    Ok(label
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect())
}

/// Hands out collision-free file names within one section write pass.
///
/// The first claim of a label gets the plain normalized name; the N-th claim
/// of the same label gets `-N` appended. Collisions are detected on the
/// normalized form, so `a b` and `a_b` do not overwrite each other.
///
/// Suffix assignment depends on claim order. Callers claim entries in a
/// stable order (entry id) before writing anything.
#[derive(Debug, Default)]
pub struct NameRegistry {
    occurrences: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a file name for `label`.
    pub fn claim(&mut self, label: &str) -> Result<String> {
        let base = normalize(label)?;
        let count = self.occurrences.entry(base.clone()).or_insert(0);
        *count += 1;

        let mut n = *count;
        let mut candidate = if n == 1 {
            base.clone()
        } else {
            format!("{base}-{n}")
        };

        while self.taken.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }

        if let Some(count) = self.occurrences.get_mut(&base) {
            *count = n;
        }
        self.taken.insert(candidate.clone());
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Demo Portal", "Demo_Portal")]
    #[case("a/b:c", "a_b_c")]
    #[case("what?*", "what__")]
    #[case("<\"quoted\">|", "__quoted___")]
    #[case("already-safe_name", "already-safe_name")]
    fn normalize_replaces_unsafe_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("..")]
    fn normalize_rejects_invalid_labels(#[case] input: &str) {
        assert!(matches!(normalize(input), Err(Error::InvalidName { .. })));
    }

    #[test]
    fn registry_suffixes_repeated_labels() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("app").unwrap(), "app");
        assert_eq!(names.claim("app").unwrap(), "app-2");
        assert_eq!(names.claim("app").unwrap(), "app-3");
        assert_eq!(names.claim("other").unwrap(), "other");
    }

    #[test]
    fn registry_detects_collisions_after_normalization() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("my app").unwrap(), "my_app");
        assert_eq!(names.claim("my_app").unwrap(), "my_app-2");
    }

    #[test]
    fn registry_skips_suffixes_taken_by_literal_labels() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("app-2").unwrap(), "app-2");
        assert_eq!(names.claim("app").unwrap(), "app");
        assert_eq!(names.claim("app").unwrap(), "app-3");
    }
}
