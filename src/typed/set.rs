//! Append-only set facade.

use serde_json::Value;
use std::sync::Arc;

use crate::schema::{CompiledValidator, SchemaError, SchemaNode};
use crate::store::{Store, StoredEntry};
use crate::value::strip_absent;

use super::errors::TypedResult;

/// Schema-guarded wrapper over a set-shaped store.
///
/// Like [`super::TypedList`], but entries are addressed by their own
/// canonical serialization, which is what makes membership and removal by
/// value possible and de-duplicates repeated adds.
pub struct TypedSet<S> {
    store: Arc<S>,
    schema: SchemaNode,
    validator: CompiledValidator,
}

impl<S: Store> TypedSet<S> {
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

    fn member_key(value: &Value) -> String {
        value.to_string()
    }

    /// Sanitizes, validates and adds `value`. Adding a value twice
    /// replaces the earlier entry.
    pub async fn add(&self, value: Value) -> TypedResult<String> {
        let sanitized = strip_absent(&value);
        self.validator
            .validate(&sanitized)
            .map_err(|violations| SchemaError::validation_failed("$root", violations))?;
        let key = Self::member_key(&sanitized);
        tracing::debug!("set add");
        Ok(self.store.put(&key, sanitized, None).await?)
    }

    /// Removes `value` from the set. The value must match the element
    /// schema, so a removal request can never address a key shape the set
    /// could not contain.
    pub async fn remove(&self, value: &Value) -> TypedResult<String> {
        let sanitized = strip_absent(value);
        self.validator
            .validate(&sanitized)
            .map_err(|violations| SchemaError::validation_failed("$root", violations))?;
        Ok(self.store.delete(&Self::member_key(&sanitized)).await?)
    }

    /// All valid members; entries failing the element schema are dropped
    /// silently.
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
