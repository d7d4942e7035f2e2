//! Storage of a whole tenant: tenant-level sections plus every workspace

use std::fmt;
use std::path::{Path, PathBuf};

use cac_fs::list_dirs;
use cac_patch::{Patch, TenantExtensions, Tree};
use cac_template::Renderer;
use serde_json::Value;

use crate::codec::TreeCodec;
use crate::error::{Error, Result};
use crate::layout::TENANT_LAYOUT;
use crate::options::StorageOptions;
use crate::server::{ServerStorage, WORKSPACES_DIR};
use crate::storage::{DirStorage, Storage};

/// Key of the per-workspace configurations in a tenant tree.
const SERVERS_KEY: &str = "servers";

#[derive(Debug, Clone)]
pub struct TenantStorage {
    root: PathBuf,
    renderer: Renderer,
    servers: ServerStorage,
}

impl Storage for TenantStorage {
    type Ext = TenantExtensions;

    fn read(&self, opts: &StorageOptions) -> Result<Patch<TenantExtensions>> {
        let mut data = TreeCodec::new(&TENANT_LAYOUT, &self.renderer).read(&self.root)?;
        let mut ext = TenantExtensions::default();
        let mut servers = Tree::new();

        for workspace in list_dirs(&self.root.join(WORKSPACES_DIR))? {
            let (id, server) = self.servers.read_workspace(&workspace, opts.secrets)?;
            let id = id.unwrap_or(workspace);

            if opts.secrets {
                ext.servers.insert(id.clone(), server.ext);
            }
            servers.insert(id, Value::Object(server.data));
        }

        if !servers.is_empty() {
            data.insert(SERVERS_KEY.to_string(), Value::Object(servers));
        }

        Ok(Patch::with_ext(data, ext).filtered(&opts.filters))
    }

    fn write(&self, patch: &Patch<TenantExtensions>, opts: &StorageOptions) -> Result<()> {
        let mut data = patch.data.clone();
        let servers = data.remove(SERVERS_KEY);

        TreeCodec::new(&TENANT_LAYOUT, &self.renderer).write(&data, &self.root)?;

        let servers = match servers {
            None | Some(Value::Null) => Tree::new(),
            Some(Value::Object(servers)) => servers,
            Some(_) => {
                return Err(Error::encode(&self.root, "servers must be a map of workspaces"));
            }
        };

        for (id, server) in servers {
            let Value::Object(server) = server else {
                return Err(Error::encode(
                    &self.servers.workspace_path(&id),
                    "workspace configuration must be a mapping",
                ));
            };

            let ext = patch
                .ext
                .server(&id)
                .cloned()
                .unwrap_or_default();
            self.servers
                .write_workspace(&id, &Patch::with_ext(server, ext), opts.secrets)?;
        }

        tracing::info!(path = %self.root.display(), "tenant configuration stored");
        Ok(())
    }
}

impl DirStorage for TenantStorage {
    fn open(root: PathBuf, renderer: Renderer) -> Self {
        Self {
            servers: ServerStorage::open(root.clone(), renderer.clone()),
            root,
            renderer,
        }
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Display for TenantStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tenant storage: {}", self.root.display())
    }
}
