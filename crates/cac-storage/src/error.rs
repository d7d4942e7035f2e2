//! Error types for cac-storage

use std::path::{Path, PathBuf};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a storage
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed content, or content rejected by strict decoding
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error(transparent)]
    Fs(#[from] cac_fs::Error),

    #[error("failed to render template {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: cac_template::Error,
    },

    #[error("workspace is required")]
    MissingWorkspace,

    #[error("at least one storage directory is required")]
    NoLayers,

    #[error("{operation} is not supported by {storage}")]
    Unsupported {
        operation: &'static str,
        storage: String,
    },

    #[error("output target cannot be empty")]
    EmptyOutput,
}

impl Error {
    pub(crate) fn decode(path: &Path, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn encode(path: &Path, message: impl Into<String>) -> Self {
        Self::Encode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
