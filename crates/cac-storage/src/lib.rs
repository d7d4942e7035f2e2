//! Directory-backed configuration storage
//!
//! A configuration tree is stored as a directory of YAML files described by a
//! [`Layout`]:
//!
//! ```text
//! <root>/tenant.yaml
//! <root>/pools/<name>.yaml
//! <root>/workspaces/<id>/server.yaml
//! <root>/workspaces/<id>/clients/<client_name>.yaml
//! <root>/workspaces/<id>/scripts/<name>.yaml + <name>.js
//! <root>/workspaces/<id>/secrets/<id>.yaml
//! ```
//!
//! [`ServerStorage`] and [`TenantStorage`] store one root each,
//! [`MultiStorage`] merges several roots with merge-patch semantics, and
//! [`DryStorage`] shows what a write would produce.

pub mod codec;
pub mod dry;
pub mod error;
pub mod layout;
pub mod multi;
pub mod options;
pub mod secrets;
pub mod server;
pub mod storage;
pub mod tenant;
pub mod yaml;

pub use codec::TreeCodec;
pub use dry::{DryStorage, DryTarget};
pub use error::{Error, Result};
pub use layout::{
    Cardinality, DisplayName, LargeText, Layout, SERVER_LAYOUT, SectionSpec, TENANT_LAYOUT,
};
pub use multi::{MultiStorage, MultiStorageConfig};
pub use options::{StorageOptions, WriteMode};
pub use server::ServerStorage;
pub use storage::{DirStorage, Storage};
pub use tenant::TenantStorage;
