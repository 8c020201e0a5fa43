//! Facade-level errors.
//!
//! Write-path errors (`put`, `delete`, `insert`) always surface to the
//! caller. Single-entry reads convert validation failures into "not
//! found"; whole-structure reads surface [`TypedStoreError::ReadInconsistency`].
//! Store errors pass through unmodified.

use thiserror::Error;

use crate::key::KeyError;
use crate::schema::validator::{format_violations, Violation};
use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for typed facade operations
pub type TypedResult<T> = Result<T, TypedStoreError>;

/// Errors surfaced by the typed store facades
#[derive(Debug, Clone, Error)]
pub enum TypedStoreError {
    /// The key could not be normalized.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The key is not in the schema, or the value was rejected.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The underlying store failed; passed through unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A whole-structure read found stored fragments that no longer match
    /// the root schema. Never raised by per-entry enumeration, which drops
    /// offending entries instead.
    #[error("inconsistent stored structure: {}", format_violations(.0))]
    ReadInconsistency(Vec<Violation>),

    /// The operation does not apply at this key (e.g. writing a plain
    /// value onto an embedded sub-store).
    #[error("unsupported operation at key '{key}': {reason}")]
    UnsupportedOperation { key: String, reason: String },
}

impl TypedStoreError {
    /// Whether this error reports a key absent from the schema.
    pub fn is_unsupported_key(&self) -> bool {
        matches!(self, TypedStoreError::Schema(SchemaError::UnsupportedKey { .. }))
    }

    /// Whether this error reports a rejected value.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            TypedStoreError::Schema(SchemaError::ValidationFailed { .. })
        )
    }
}
