//! Layered storage: several roots merged into one document
//!
//! Layer 0 has the highest precedence and is the only one written to. Lower
//! layers act as shared defaults; moving entries between layers is left to
//! the operator.

use std::fmt;
use std::path::PathBuf;

use cac_patch::Patch;
use cac_template::Renderer;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::StorageOptions;
use crate::storage::{DirStorage, Storage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiStorageConfig {
    /// Layer roots, highest precedence first
    pub dir_path: Vec<PathBuf>,
}

impl Default for MultiStorageConfig {
    fn default() -> Self {
        Self {
            dir_path: vec![PathBuf::from("data")],
        }
    }
}

#[derive(Debug, Clone)]
pub struct MultiStorage<S> {
    layers: Vec<S>,
}

impl<S: DirStorage> MultiStorage<S> {
    /// Open one layer per configured directory.
    pub fn new(config: &MultiStorageConfig, renderer: &Renderer) -> Result<Self> {
        Self::from_layers(
            config
                .dir_path
                .iter()
                .map(|root| S::open(root.clone(), renderer.clone()))
                .collect(),
        )
    }
}

impl<S: Storage> MultiStorage<S> {
    pub fn from_layers(layers: Vec<S>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::NoLayers);
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[S] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<S> {
        self.layers
    }
}

impl<S: Storage> Storage for MultiStorage<S> {
    type Ext = S::Ext;

    /// Fold every layer from the lowest precedence up.
    fn read(&self, opts: &StorageOptions) -> Result<Patch<S::Ext>> {
        let mut merged = Patch::default();

        for (index, layer) in self.layers.iter().enumerate().rev() {
            let patch = layer.read(opts)?;
            tracing::debug!(layer = index, storage = %layer, sections = patch.data.len(), "merging layer");
            merged.merge(patch);
        }

        Ok(merged.filtered(&opts.filters))
    }

    fn write(&self, patch: &Patch<S::Ext>, opts: &StorageOptions) -> Result<()> {
        self.layers
            .first()
            .ok_or(Error::NoLayers)?
            .write(patch, opts)
    }
}

impl<S: Storage> fmt::Display for MultiStorage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage: [")?;
        for (index, layer) in self.layers.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{layer}")?;
        }
        write!(f, "]")
    }
}
