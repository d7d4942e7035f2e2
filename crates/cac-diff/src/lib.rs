//! Structural diff of configuration trees
//!
//! [`diff`] compares a source tree with a target tree:
//!
//! 1. identity fields are stripped and both trees are brought into
//!    canonical form
//! 2. optionally, target keys the source does not manage are pruned
//! 3. optionally, only the requested sections are kept
//! 4. the trees are compared, skipping secret and volatile fields
//! 5. the changes are rendered as text, `-` for the source side and `+` for
//!    the target side
//!
//! Arrays are compared as multisets: reordering alone is never a change.

pub mod compare;
pub mod error;
pub mod path;
pub mod present;
pub mod render;
pub mod rules;

pub use compare::{Change, Comparer};
pub use error::{Error, Result};
pub use path::{FieldPath, Segment};
pub use present::{only_present_keys, prune_to_source};
pub use render::{render, render_colored};
pub use rules::{FieldRules, SECRET_FIELDS, VOLATILE_FIELDS};

use cac_patch::{Tree, clean_patch, filter_patch, normalize_patch};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Wrap removals and additions in terminal colors
    pub color: bool,
    /// Ignore target keys absent from the source
    pub present_at_source: bool,
    /// Section allow-list, empty for everything
    pub filters: Vec<String>,
    /// Compare secret fields too
    pub secrets: bool,
    /// Skip fields such as `updated_at`
    pub filter_volatile: bool,
    /// Additional patterns of fields to skip
    pub ignore_fields: Vec<String>,
}

/// The changes turning `source` into `target`.
pub fn changes(source: &Tree, target: &Tree, opts: &DiffOptions) -> Result<Vec<Change>> {
    let source = prepare(source);
    let mut target = prepare(target);

    if opts.present_at_source {
        prune_to_source(&source, &mut target);
    }

    let (source, target) = if opts.filters.is_empty() {
        (source, target)
    } else {
        (
            filter_patch(&source, &opts.filters),
            filter_patch(&target, &opts.filters),
        )
    };

    let extra = FieldRules::new(&opts.ignore_fields)?;
    let mut comparer = Comparer::new().ignore(&extra);
    if !opts.secrets {
        comparer = comparer.ignore(FieldRules::secrets());
    }
    if opts.filter_volatile {
        comparer = comparer.ignore(FieldRules::volatile());
    }

    let changes = comparer.compare(&Value::Object(source), &Value::Object(target));
    tracing::debug!(changes = changes.len(), "compared configuration trees");
    Ok(changes)
}

/// Render the difference between `source` and `target`; empty when there is
/// none.
pub fn diff(source: &Tree, target: &Tree, opts: &DiffOptions) -> Result<String> {
    let changes = changes(source, target, opts)?;

    Ok(if opts.color {
        render_colored(&changes)
    } else {
        render(&changes)
    })
}

fn prepare(tree: &Tree) -> Tree {
    let mut tree = normalize_patch(tree);
    clean_patch(&mut tree);
    tree
}
