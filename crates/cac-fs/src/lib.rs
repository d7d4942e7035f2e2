//! Filesystem primitives for configuration-as-code storage
//!
//! Provides file-name normalization, locked atomic writes, directory
//! listing, and format-agnostic loading of configuration files.

pub mod config;
pub mod error;
pub mod io;
pub mod listing;
pub mod name;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use listing::{list_dirs, list_files};
pub use name::{NameRegistry, normalize};
