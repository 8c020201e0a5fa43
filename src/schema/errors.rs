//! Schema resolution and validation errors.

use thiserror::Error;

use super::validator::{format_violations, Violation};

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while resolving or validating against a schema
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The key does not exist in the schema. Carries the offending path.
    #[error("Unsupported key {key}.")]
    UnsupportedKey { key: String },

    /// The value at a supported key was rejected.
    #[error("validation failed for key '{key}': {}", format_violations(violations))]
    ValidationFailed {
        key: String,
        violations: Vec<Violation>,
    },
}

impl SchemaError {
    pub fn unsupported_key(key: impl Into<String>) -> Self {
        SchemaError::UnsupportedKey { key: key.into() }
    }

    pub fn validation_failed(key: impl Into<String>, violations: Vec<Violation>) -> Self {
        SchemaError::ValidationFailed {
            key: key.into(),
            violations,
        }
    }

    /// Returns the violation list for validation failures.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            SchemaError::ValidationFailed { violations, .. } => Some(violations),
            SchemaError::UnsupportedKey { .. } => None,
        }
    }
}
