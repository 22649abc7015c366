//! Error types for treeloclib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a directory tree
#[derive(Error, Debug)]
pub enum TreelocError {
    /// Scan root does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Scan root exists but is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid exclusion pattern
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
