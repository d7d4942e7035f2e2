//! Field exclusion rules

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::path::FieldPath;

/// Credential-bearing fields, excluded unless secrets are requested.
pub const SECRET_FIELDS: &[&str] = &[
    r#"\["rotated_secrets"\]"#,
    r#"\["hashed_rotated_secret"\]"#,
    // workspace keys when comparing a single workspace
    r#"^\["jwks"\]"#,
    // workspace keys when comparing a tenant
    r#"^\["servers"\]\[[^\]]+\]\["jwks"\]"#,
    r#"\["webhooks"\].*\["api_key"\]"#,
    r#"\["mfa_methods"\].*\["auth"\]"#,
];

/// Fields that change on their own, excluded on request.
pub const VOLATILE_FIELDS: &[&str] = &[r#"\["updated_at"\]"#, r#"\["last_active"\]"#];

static SECRET_RULES: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::new(SECRET_FIELDS).expect("Invalid secret field pattern"));

static VOLATILE_RULES: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::new(VOLATILE_FIELDS).expect("Invalid volatile field pattern"));

/// A set of regular expressions matched against [`FieldPath::match_form`].
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    patterns: Vec<Regex>,
}

impl FieldRules {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self { patterns })
    }

    pub fn secrets() -> &'static FieldRules {
        &SECRET_RULES
    }

    pub fn volatile() -> &'static FieldRules {
        &VOLATILE_RULES
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, path: &FieldPath) -> bool {
        if self.patterns.is_empty() || path.is_root() {
            return false;
        }

        let form = path.match_form();
        self.patterns.iter().any(|pattern| pattern.is_match(&form))
    }
}
