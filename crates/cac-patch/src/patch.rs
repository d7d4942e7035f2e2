//! A configuration tree paired with its extensions

use serde::{Deserialize, Serialize};

use crate::extensions::Extensions;
use crate::ops::{filter_patch, merge_tree};
use crate::tree::Tree;

/// The unit of exchange between storages: a tree plus an [`Extensions`]
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "E: Deserialize<'de> + Default"))]
pub struct Patch<E> {
    #[serde(default)]
    pub data: Tree,
    #[serde(default)]
    pub ext: E,
}

impl<E: Extensions> Patch<E> {
    pub fn new(data: Tree) -> Self {
        Self {
            data,
            ext: E::default(),
        }
    }

    pub fn with_ext(data: Tree, ext: E) -> Self {
        Self { data, ext }
    }

    /// Overlay `other` onto this patch: the tree as a merge patch, the
    /// extensions by their own rules.
    pub fn merge(&mut self, other: Patch<E>) {
        merge_tree(&mut self.data, &other.data);
        self.ext.merge(other.ext);
    }

    /// A copy restricted to the requested sections. Extensions are kept.
    pub fn filtered<S: AsRef<str>>(&self, sections: &[S]) -> Self {
        Self {
            data: filter_patch(&self.data, sections),
            ext: self.ext.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.ext.is_empty()
    }
}
