//! Append-only list facade.

use serde_json::Value;
use std::sync::Arc;

use crate::schema::{CompiledValidator, SchemaError, SchemaNode};
use crate::store::{Store, StoredEntry};
use crate::value::strip_absent;

use super::errors::TypedResult;

/// Schema-guarded wrapper over an append-only list store.
///
/// Every entry must match one element schema; there are no keys beyond
/// the identifiers the store assigns.
pub struct TypedList<S> {
    store: Arc<S>,
    schema: SchemaNode,
    validator: CompiledValidator,
}

impl<S: Store> TypedList<S> {
    pub fn new(store: Arc<S>, schema: SchemaNode) -> Self {
        let validator = CompiledValidator::for_node(&schema);
        Self {
            store,
            schema,
            validator,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Sanitizes and appends `value`, returning the new identifier.
    pub async fn add(&self, value: Value) -> TypedResult<String> {
        let sanitized = strip_absent(&value);
        self.validator
            .validate(&sanitized)
            .map_err(|violations| SchemaError::validation_failed("$root", violations))?;
        tracing::debug!("list add");
        Ok(self.store.append(sanitized).await?)
    }

    /// Removes the entry with the given identifier.
    pub async fn remove(&self, id: &str) -> TypedResult<String> {
        Ok(self.store.delete(id).await?)
    }

    /// All valid entries in log order; entries failing the element schema
    /// are dropped silently.
    pub async fn all(&self) -> TypedResult<Vec<StoredEntry>> {
        let raw = self.store.entries().await?;
        Ok(raw
            .into_iter()
            .filter(|entry| {
                if self.validator.is_valid(&entry.value) {
                    true
                } else {
                    tracing::warn!(id = %entry.id, "dropping entry with schema-violating value");
                    false
                }
            })
            .collect())
    }

    // Lifecycle, forwarded verbatim.

    pub async fn open(&self) -> TypedResult<()> {
        Ok(self.store.open().await?)
    }

    pub async fn close(&self) -> TypedResult<()> {
        Ok(self.store.close().await?)
    }

    pub async fn destroy(&self) -> TypedResult<()> {
        Ok(self.store.destroy().await?)
    }
}
