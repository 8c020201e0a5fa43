//! Per-path validator cache.
//!
//! One compiled validator per distinct canonical path, populated lazily
//! and retained for the lifetime of the owning store wrapper. Schemas are
//! immutable, so entries are never invalidated. Memoization is idempotent
//! rather than exclusive: two callers racing on the same cold path may
//! both compile, and either result may be kept — compiled validators are
//! pure and interchangeable.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::key::PathKey;

use super::errors::{SchemaError, SchemaResult};
use super::tree::{resolve, Resolution};
use super::types::SchemaNode;
use super::validator::CompiledValidator;

/// Lazily populated mapping from canonical joined path to compiled
/// validator.
#[derive(Debug, Default)]
pub struct ValidatorCache {
    compiled: RwLock<HashMap<String, Arc<CompiledValidator>>>,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the validator governing `key`, compiling it on first use.
    ///
    /// An unsupported path never fabricates a validator; it is an
    /// [`SchemaError::UnsupportedKey`] error.
    pub fn validator_for(
        &self,
        schema: &SchemaNode,
        key: &PathKey,
    ) -> SchemaResult<Arc<CompiledValidator>> {
        if let Some(validator) = self.compiled.read().get(key.joined()) {
            return Ok(Arc::clone(validator));
        }

        let compiled = match resolve(schema, key) {
            Resolution::Unsupported => return Err(SchemaError::unsupported_key(key.joined())),
            Resolution::Branch(branch) => Arc::new(CompiledValidator::compile(&branch)),
        };

        let mut guard = self.compiled.write();
        let entry = guard
            .entry(key.joined().to_owned())
            .or_insert(compiled);
        Ok(Arc::clone(entry))
    }

    /// Number of distinct paths compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.read().is_empty()
    }
}
