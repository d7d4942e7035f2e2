//! Error types for cac-template

use std::path::PathBuf;

/// Result type for template rendering
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a template
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The template file itself could not be read
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `include` target could not be read
    #[error("failed to include {path}: {source}")]
    Include {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `env` lookup found no value
    #[error("environment variable not found: {name}")]
    EnvNotFound { name: String },

    #[error("template syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("unknown template function: {name}")]
    UnknownFunction { name: String },

    #[error("invalid arguments for {function}: {message}")]
    Arguments { function: String, message: String },
}

impl Error {
    /// Whether the template file itself does not exist.
    ///
    /// A missing `include` target is not covered: that is a broken reference
    /// inside an existing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn arguments(function: &str, message: impl Into<String>) -> Self {
        Self::Arguments {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
