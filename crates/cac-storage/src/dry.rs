//! Dry-run output for writes that would otherwise go to a remote

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use cac_fs::io;
use cac_patch::{Extensions, Patch};
use cac_template::Renderer;

use crate::error::{Error, Result};
use crate::options::StorageOptions;
use crate::storage::{DirStorage, Storage};

#[derive(Debug, Clone)]
pub enum DryTarget<S> {
    Stdout,
    /// A single flat YAML document
    File(PathBuf),
    /// An existing directory, written through a storage rooted there
    Storage(S),
}

/// Write-only storage that shows what would be written.
#[derive(Debug, Clone)]
pub struct DryStorage<S> {
    target: DryTarget<S>,
}

impl<S: DirStorage> DryStorage<S> {
    /// Choose the target from `out`: `-` is stdout, an existing directory is
    /// a storage root, anything else is a file.
    pub fn new(out: &str, renderer: &Renderer) -> Result<Self> {
        let target = match out {
            "" => return Err(Error::EmptyOutput),
            "-" => DryTarget::Stdout,
            path => {
                let path = PathBuf::from(path);
                if path.is_dir() {
                    DryTarget::Storage(S::open(path, renderer.clone()))
                } else {
                    DryTarget::File(path)
                }
            }
        };

        Ok(Self { target })
    }
}

impl<S> DryStorage<S> {
    pub fn target(&self) -> &DryTarget<S> {
        &self.target
    }
}

/// The patch tree as one YAML document.
pub fn render_flat<E: Extensions>(patch: &Patch<E>) -> Result<String> {
    serde_yaml::to_string(&patch.data)
        .map_err(|e| Error::encode(std::path::Path::new("-"), e.to_string()))
}

impl<S: Storage> Storage for DryStorage<S> {
    type Ext = S::Ext;

    fn read(&self, _opts: &StorageOptions) -> Result<Patch<S::Ext>> {
        Err(Error::Unsupported {
            operation: "read",
            storage: self.to_string(),
        })
    }

    fn write(&self, patch: &Patch<S::Ext>, opts: &StorageOptions) -> Result<()> {
        match &self.target {
            DryTarget::Stdout => {
                let text = render_flat(patch)?;
                std::io::stdout()
                    .lock()
                    .write_all(text.as_bytes())
                    .map_err(|e| cac_fs::Error::io("<stdout>", e))?;
            }
            DryTarget::File(path) => io::write_text(path, &render_flat(patch)?)?,
            DryTarget::Storage(storage) => storage.write(patch, opts)?,
        }
        Ok(())
    }
}

impl<S: fmt::Display> fmt::Display for DryStorage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            DryTarget::Stdout => write!(f, "dry run: stdout"),
            DryTarget::File(path) => write!(f, "dry run: {}", path.display()),
            DryTarget::Storage(storage) => write!(f, "dry run: {storage}"),
        }
    }
}
