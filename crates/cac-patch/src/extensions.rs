//! Side payloads carried next to a configuration tree
//!
//! Secrets never appear in the tree itself. They travel in an
//! [`Extensions`] value that merges by key, so a lower layer can contribute a
//! secret that a higher layer does not mention.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Typed payload merged alongside a [`Patch`](crate::Patch) tree.
pub trait Extensions: Default + Clone + fmt::Debug + Send + Sync {
    /// Fold `other` into `self`; entries from `other` win on conflict.
    fn merge(&mut self, other: Self);

    /// Whether there is nothing to write.
    fn is_empty(&self) -> bool;
}

/// No extensions.
impl Extensions for () {
    fn merge(&mut self, _other: Self) {}

    fn is_empty(&self) -> bool {
        true
    }
}

/// A client secret held outside the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Secret {
    pub id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
}

/// Extensions of a single server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerExtensions {
    /// Client secrets keyed by client id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secrets: BTreeMap<String, Secret>,
}

impl ServerExtensions {
    pub fn secret(&self, client_id: &str) -> Option<&Secret> {
        self.secrets.get(client_id)
    }
}

impl Extensions for ServerExtensions {
    fn merge(&mut self, other: Self) {
        self.secrets.extend(other.secrets);
    }

    fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

/// Extensions of a tenant: one [`ServerExtensions`] per server id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantExtensions {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, ServerExtensions>,
}

impl TenantExtensions {
    pub fn server(&self, id: &str) -> Option<&ServerExtensions> {
        self.servers.get(id)
    }
}

impl Extensions for TenantExtensions {
    fn merge(&mut self, other: Self) {
        for (id, ext) in other.servers {
            self.servers.entry(id).or_default().merge(ext);
        }
    }

    fn is_empty(&self) -> bool {
        self.servers.values().all(Extensions::is_empty)
    }
}
