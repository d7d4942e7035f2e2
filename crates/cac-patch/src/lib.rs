//! Configuration trees and JSON Merge Patch operations
//!
//! A configuration document is a schema-less [`serde_json::Value`]. This
//! crate provides:
//!
//! - **RFC 7396 merge**: [`merge`] / [`merge_tree`], where `null` deletes,
//!   objects recurse and everything else replaces
//! - **Section filtering**: [`filter_patch`] with user-facing aliases
//! - **Identity stripping**: [`clean_patch`] drops round-trip artifacts
//! - **Canonical form**: [`normalize_patch`] so equal configurations compare
//!   equal regardless of representation
//! - **Patches with side payloads**: [`Patch`] pairs a tree with
//!   [`Extensions`] (secrets) that follow their own merge rules

pub mod extensions;
pub mod ops;
pub mod patch;
pub mod tree;

pub use extensions::{Extensions, Secret, ServerExtensions, TenantExtensions};
pub use ops::{
    IDENTITY_FIELDS, clean_patch, filter_patch, merge, merge_tree, normalize_patch,
    resolve_section_alias,
};
pub use patch::Patch;
pub use tree::{ConfigTree, Tree, is_zero};
