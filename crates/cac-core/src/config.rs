//! Application configuration with named profiles
//!
//! ```yaml
//! storage:
//!   dir_path: [data]
//! logging:
//!   level: debug
//! profiles:
//!   staging:
//!     storage:
//!       dir_path: [staging, data]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use cac_fs::ConfigStore;
use cac_storage::MultiStorageConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;

/// Profile name selecting the top-level configuration.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub storage: MultiStorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfiguration {
    #[serde(flatten)]
    pub default: Configuration,
    /// Complete alternative configurations, selected by name
    pub profiles: BTreeMap<String, Configuration>,
}

impl RootConfiguration {
    /// Load from a `.toml`, `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path.display(), profiles = config.profiles.len(), "Loaded configuration");
        Ok(config)
    }

    /// The configuration for `name`; empty or `default` selects the top level.
    pub fn for_profile(&self, name: &str) -> Result<&Configuration> {
        if name.is_empty() || name == DEFAULT_PROFILE {
            return Ok(&self.default);
        }

        self.profiles.get(name).ok_or_else(|| Error::UnknownProfile {
            name: name.to_string(),
        })
    }
}
