//! Key normalization errors.

use thiserror::Error;

/// Result type for key operations
pub type KeyResult<T> = Result<T, KeyError>;

/// Errors raised while normalizing a structured key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("malformed key: {0}")]
    Malformed(String),
}

impl KeyError {
    pub fn empty() -> Self {
        KeyError::Malformed("key must not be empty".into())
    }

    pub fn empty_segment(key: impl Into<String>) -> Self {
        KeyError::Malformed(format!("empty segment in key '{}'", key.into()))
    }

    pub fn separator_in_segment(segment: impl Into<String>) -> Self {
        KeyError::Malformed(format!(
            "segment '{}' contains the separator character",
            segment.into()
        ))
    }
}
