//! Error types for Terra core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in local store and preferences operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] terra_storage::StorageError),

    /// Record or snapshot codec error.
    #[error("codec error: {0}")]
    Codec(#[from] terra_codec::CodecError),

    /// Preferences document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
