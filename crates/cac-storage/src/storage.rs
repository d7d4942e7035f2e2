//! The storage abstraction

use std::fmt;
use std::path::{Path, PathBuf};

use cac_patch::{Extensions, Patch};
use cac_template::Renderer;

use crate::error::Result;
use crate::options::StorageOptions;

/// Something a [`Patch`] can be read from and written to.
pub trait Storage: fmt::Display {
    type Ext: Extensions;

    fn read(&self, opts: &StorageOptions) -> Result<Patch<Self::Ext>>;

    fn write(&self, patch: &Patch<Self::Ext>, opts: &StorageOptions) -> Result<()>;
}

/// A [`Storage`] rooted at a single directory.
pub trait DirStorage: Storage + Sized {
    fn open(root: PathBuf, renderer: Renderer) -> Self;

    fn root(&self) -> &Path;
}
