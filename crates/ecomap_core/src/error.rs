//! Error types for ecomap core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in ecomap core operations.
///
/// Journal bookkeeping itself never fails; these errors come from the edges
/// where payloads are decoded or a backing store is touched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing store error.
    #[error("store error: {0}")]
    Store(#[from] ecomap_store::StoreError),

    /// Update payload codec error.
    #[error("codec error: {0}")]
    Codec(#[from] ecomap_codec::CodecError),

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
