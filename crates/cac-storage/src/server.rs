//! Storage of a single workspace (server) configuration

use std::fmt;
use std::path::{Path, PathBuf};

use cac_patch::{Patch, ServerExtensions, clean_patch};
use cac_template::Renderer;
use serde_json::Value;

use crate::codec::TreeCodec;
use crate::error::Result;
use crate::layout::SERVER_LAYOUT;
use crate::options::StorageOptions;
use crate::secrets::{SECRETS_DIR, read_secrets, write_secrets};
use crate::storage::{DirStorage, Storage};

/// Directory below a storage root holding one directory per workspace.
pub const WORKSPACES_DIR: &str = "workspaces";

/// Stores workspaces under `<root>/workspaces/<id>/`.
#[derive(Debug, Clone)]
pub struct ServerStorage {
    root: PathBuf,
    renderer: Renderer,
}

impl ServerStorage {
    pub fn workspace_path(&self, workspace: &str) -> PathBuf {
        self.root.join(WORKSPACES_DIR).join(workspace)
    }

    /// Read one workspace, returning the id recorded in its root document
    /// separately from the configuration.
    pub(crate) fn read_workspace(
        &self,
        workspace: &str,
        secrets: bool,
    ) -> Result<(Option<String>, Patch<ServerExtensions>)> {
        let path = self.workspace_path(workspace);
        let mut data = TreeCodec::new(&SERVER_LAYOUT, &self.renderer).read(&path)?;

        let id = match data.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            _ => None,
        };
        clean_patch(&mut data);

        let mut ext = ServerExtensions::default();
        if secrets {
            ext.secrets = read_secrets(&self.renderer, &path.join(SECRETS_DIR))?;
        }

        tracing::debug!(workspace, path = %path.display(), sections = data.len(), "read workspace");
        Ok((id, Patch::with_ext(data, ext)))
    }

    pub(crate) fn write_workspace(
        &self,
        workspace: &str,
        patch: &Patch<ServerExtensions>,
        secrets: bool,
    ) -> Result<()> {
        let path = self.workspace_path(workspace);

        let mut data = patch.data.clone();
        clean_patch(&mut data);
        data.insert("id".to_string(), Value::String(workspace.to_string()));

        TreeCodec::new(&SERVER_LAYOUT, &self.renderer).write(&data, &path)?;

        if secrets {
            write_secrets(&path.join(SECRETS_DIR), &patch.ext.secrets)?;
        }

        tracing::info!(workspace, path = %path.display(), "workspace configuration stored");
        Ok(())
    }
}

impl Storage for ServerStorage {
    type Ext = ServerExtensions;

    fn read(&self, opts: &StorageOptions) -> Result<Patch<ServerExtensions>> {
        let workspace = opts.require_workspace()?;
        let (_, patch) = self.read_workspace(workspace, opts.secrets)?;
        Ok(patch.filtered(&opts.filters))
    }

    fn write(&self, patch: &Patch<ServerExtensions>, opts: &StorageOptions) -> Result<()> {
        let workspace = opts.require_workspace()?;
        self.write_workspace(workspace, patch, opts.secrets)
    }
}

impl DirStorage for ServerStorage {
    fn open(root: PathBuf, renderer: Renderer) -> Self {
        Self { root, renderer }
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Display for ServerStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server storage: {}", self.root.display())
    }
}
