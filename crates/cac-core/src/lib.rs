//! Orchestration layer for configuration-as-code
//!
//! Ties the library crates together for an embedding binary:
//!
//! - [`config`]: the configuration file with named profiles
//! - [`logging`]: `tracing` subscriber setup
//! - [`source`]: the [`Source`] abstraction over local, remote and merged
//!   configuration
//! - [`app`]: [`Application`] with `pull`, `push` and `diff`

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod source;
pub mod validator;

pub use app::Application;
pub use config::{Configuration, DEFAULT_PROFILE, RootConfiguration};
pub use error::{Error, Result};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use source::{Connector, MergedSource, Source, SourceOptions, SourceSpec, SourceType};
pub use validator::Validator;
