//! Error types for the sync engine.

use terra_codec::CodecError;
use terra_core::CoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while resolving catalog data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Transport failure or non-success HTTP status.
    #[error("network error: {message}")]
    Network {
        /// Error message.
        message: String,
        /// HTTP status, if a response was received.
        status: Option<u16>,
    },

    /// The remote call timed out.
    #[error("request timed out")]
    Timeout,

    /// The remote payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),

    /// No record matches the requested code.
    #[error("no record with code {code}")]
    NotFound {
        /// The requested code.
        code: String,
    },

    /// Cache-only read before the cache was ever populated.
    #[error("no cached data")]
    EmptyCache,

    /// Malformed caller input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The local store failed to read or persist.
    #[error("local store error: {0}")]
    Store(String),

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl SyncError {
    /// Creates a network error without a status.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a network error for a non-success HTTP status.
    pub fn http_status(status: u16) -> Self {
        Self::Network {
            message: format!("server responded with HTTP {status}"),
            status: Some(status),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// Returns true if cached data may stand in for the failed request.
    ///
    /// These are exactly the remote-side failures: network, timeout and
    /// decode errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SyncError::Network { .. } | SyncError::Timeout | SyncError::Decode(_)
        )
    }
}

impl From<CoreError> for SyncError {
    fn from(error: CoreError) -> Self {
        SyncError::Store(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors() {
        assert!(SyncError::network("connection reset").is_recoverable());
        assert!(SyncError::http_status(503).is_recoverable());
        assert!(SyncError::Timeout.is_recoverable());
        assert!(SyncError::Decode(CodecError::NoValidRecords { total: 3 }).is_recoverable());

        assert!(!SyncError::not_found("XYZ").is_recoverable());
        assert!(!SyncError::EmptyCache.is_recoverable());
        assert!(!SyncError::Validation("bad".into()).is_recoverable());
        assert!(!SyncError::Store("disk full".into()).is_recoverable());
        assert!(!SyncError::Cancelled.is_recoverable());
    }

    #[test]
    fn error_display() {
        assert_eq!(SyncError::EmptyCache.to_string(), "no cached data");
        assert!(SyncError::http_status(404).to_string().contains("404"));
        assert!(SyncError::not_found("XYZ").to_string().contains("XYZ"));
    }

    #[test]
    fn store_errors_convert() {
        let core = CoreError::Codec(CodecError::encoding_failed("boom"));
        let error: SyncError = core.into();
        assert!(matches!(error, SyncError::Store(message) if message.contains("boom")));
    }
}
