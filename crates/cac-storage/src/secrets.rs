//! Secrets kept next to a workspace, one file per secret

use std::collections::BTreeMap;
use std::path::Path;

use cac_fs::{NameRegistry, io, listing};
use cac_patch::Secret;
use cac_template::{Renderer, escape_actions};

use crate::codec::YAML_EXTENSIONS;
use crate::error::{Error, Result};

/// Directory below a workspace holding its secrets.
pub const SECRETS_DIR: &str = "secrets";

/// Write each secret to `<dir>/<id>.yaml`.
pub fn write_secrets(dir: &Path, secrets: &BTreeMap<String, Secret>) -> Result<()> {
    let mut names = NameRegistry::new();

    for (id, secret) in secrets {
        let path = dir.join(format!("{}.{}", names.claim(id)?, YAML_EXTENSIONS[0]));
        let record = Secret {
            id: id.clone(),
            ..secret.clone()
        };
        let text = serde_yaml::to_string(&record).map_err(|e| Error::encode(&path, e.to_string()))?;
        io::write_text(&path, &escape_actions(&text))?;
    }

    if !secrets.is_empty() {
        tracing::debug!(path = %dir.display(), count = secrets.len(), "stored secrets");
    }
    Ok(())
}

/// Read every secret below `dir`, keyed by id. A missing directory holds no
/// secrets.
pub fn read_secrets(renderer: &Renderer, dir: &Path) -> Result<BTreeMap<String, Secret>> {
    let mut secrets = BTreeMap::new();

    for path in listing::list_dir_files(dir)? {
        let recognized = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext));
        if !recognized {
            tracing::warn!(path = %path.display(), "skipping file with unrecognized extension");
            continue;
        }

        let text = renderer.render_file(&path).map_err(|source| Error::Render {
            path: path.clone(),
            source,
        })?;
        let secret: Secret =
            serde_yaml::from_str(&text).map_err(|e| Error::decode(&path, e.to_string()))?;

        if secret.id.is_empty() {
            return Err(Error::decode(&path, "missing or empty id"));
        }
        if secrets.contains_key(&secret.id) {
            return Err(Error::decode(&path, format!("duplicate id {:?}", secret.id)));
        }

        secrets.insert(secret.id.clone(), secret);
    }

    Ok(secrets)
}
