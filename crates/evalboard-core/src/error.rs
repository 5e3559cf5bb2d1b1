//! Error types for evalboard
//!
//! Only conditions that stop the whole invocation surface as errors. Missing or
//! malformed per-run and per-task records are degraded to defaults by the
//! loader and never reach this type.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for evalboard operations
pub type EvalboardResult<T> = Result<T, EvalboardError>;

/// Main error type for evalboard
#[derive(Error, Debug)]
pub enum EvalboardError {
    /// Filesystem errors (unreadable results root, unwritable report)
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration or report file could not be parsed
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Semantically invalid configuration (bad rates, k == 0, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unrecognized report format name
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),
}

impl EvalboardError {
    /// Create an IO error bound to a path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a parse error bound to a path
    pub fn parse(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
