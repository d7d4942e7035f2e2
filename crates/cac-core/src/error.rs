//! Error types for cac-core

/// Result type for cac-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cac-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source kind other than `local`, `remote` or `merged`
    #[error("Unknown source: {value}")]
    UnknownSource { value: String },

    #[error("Unknown profile: {name}")]
    UnknownProfile { name: String },

    /// A remote source was requested but no connector is configured
    #[error("No remote configured for profile '{profile}'")]
    NoRemote { profile: String },

    #[error("Remote error: {message}")]
    Remote { message: String },

    #[error("Failed to validate configuration: {message}")]
    Validation { message: String },

    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    // Transparent wrappers for underlying crate errors
    /// Storage error from cac-storage
    #[error(transparent)]
    Storage(#[from] cac_storage::Error),

    /// Diff error from cac-diff
    #[error(transparent)]
    Diff(#[from] cac_diff::Error),

    /// Filesystem error from cac-fs
    #[error(transparent)]
    Fs(#[from] cac_fs::Error),

    /// Template error from cac-template
    #[error(transparent)]
    Template(#[from] cac_template::Error),
}
