//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a value.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode bytes or text.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// A record code is missing or not in the expected format.
    #[error("invalid record code: {value:?}")]
    InvalidCode {
        /// The offending raw value.
        value: String,
    },

    /// A non-empty batch produced no usable record.
    #[error("none of the {total} records in the payload could be decoded")]
    NoValidRecords {
        /// Number of records in the payload.
        total: usize,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Create an invalid code error.
    pub fn invalid_code(value: impl Into<String>) -> Self {
        Self::InvalidCode {
            value: value.into(),
        }
    }
}
