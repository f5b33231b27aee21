//! Error types for the codec crate.

use crate::update::UpdateKind;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a payload to CBOR.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode a payload of the given kind.
    #[error("decoding {kind} payload failed: {message}")]
    DecodingFailed {
        /// The kind the payload was tagged with.
        kind: UpdateKind,
        /// Description of the decoding error.
        message: String,
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
    pub fn decoding_failed(kind: UpdateKind, message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            kind,
            message: message.into(),
        }
    }
}
