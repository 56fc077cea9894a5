//! Error types for polyloclib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a source tree
#[derive(Error, Debug)]
pub enum PolylocError {
    /// Invalid ignore or exclude pattern
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Start path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Failed to read an ignore-rule file
    #[error("failed to read ignore file '{path}': {source}")]
    IgnoreFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
