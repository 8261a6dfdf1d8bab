//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target path cannot hold a snapshot (e.g. it has no file name).
    #[error("invalid storage path: {0}")]
    InvalidPath(String),

    /// A simulated or backend-reported write failure.
    #[error("write rejected: {0}")]
    WriteRejected(String),
}
