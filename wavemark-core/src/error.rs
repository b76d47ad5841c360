//! Error types for wavemark-core
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wavemark operations
#[derive(Error, Debug)]
pub enum Error {
    /// Source audio file does not exist
    #[error("audio file not found: {path}")]
    FileNotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// File extension is not in the supported set
    #[error("unsupported audio format '.{extension}'")]
    UnsupportedFormat {
        /// Lowercased extension of the rejected file
        extension: String,
    },

    /// Voice tag asset missing at the configured path
    #[error("voice tag file not found: {path}")]
    TagNotFound {
        /// Configured tag path
        path: PathBuf,
    },

    /// Invalid caller-supplied parameter
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying decode/encode failure
    #[error("codec error: {0}")]
    Codec(String),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using wavemark Error
pub type Result<T> = std::result::Result<T, Error>;
