//! Underlying store errors.
//!
//! These are the collaborator's own failures, passed through the typed
//! facades unmodified. The facades add no retry behavior.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a [`super::Store`] implementation
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("operation not supported by this store shape: {0}")]
    Unsupported(&'static str),

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("store backend error: {0}")]
    Backend(String),
}
