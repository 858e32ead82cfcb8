//! Error types for the background removal web service

use std::path::Path;

use thiserror::Error;

/// Convenient result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BgWebError>;

/// Errors produced by the web service outside of the search client
///
/// The search client carries its own error type because it must preserve
/// the upstream HTTP status for relaying; everything else funnels through
/// these variants.
#[derive(Debug, Error)]
pub enum BgWebError {
    /// Segmentation, decoding, or encoding failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// Configuration was missing or rejected during validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A file system operation failed
    #[error("Failed to {operation} '{path}': {message}")]
    FileIo {
        /// Operation being attempted, e.g. "write output image"
        operation: String,
        /// Path involved in the failure
        path: String,
        /// Underlying I/O error text
        message: String,
    },

    /// An outbound network operation failed
    #[error("Network error: {0}")]
    Network(String),

    /// Internal invariant violation, e.g. a worker channel closed early
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BgWebError {
    /// Create a processing error from any displayable message
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create a configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a file I/O error with operation context
    pub fn file_io_error(operation: &str, path: &Path, source: &std::io::Error) -> Self {
        Self::FileIo {
            operation: operation.to_string(),
            path: path.display().to_string(),
            message: source.to_string(),
        }
    }

    /// Create a network error
    pub fn network_error<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}
