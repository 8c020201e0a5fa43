//! Ordered dictionary facade.

use serde_json::Value;
use std::sync::Arc;

use crate::key::PathKey;
use crate::schema::{SchemaNode, ValidatorCache};
use crate::store::{Store, StoredEntry};
use crate::value::is_absent;

use super::errors::TypedResult;
use super::{checked_write_value, entry_passes};

/// Schema-guarded wrapper over an ordered dictionary store.
///
/// Same key/value contract as [`super::TypedDict`], plus an optional
/// insertion position on writes and an explicit `move_entry`. Positions
/// are indices into the store's enumeration order.
pub struct TypedOrderedDict<S> {
    store: Arc<S>,
    schema: SchemaNode,
    cache: ValidatorCache,
}

impl<S: Store> TypedOrderedDict<S> {
    pub fn new(store: Arc<S>, schema: SchemaNode) -> Self {
        Self {
            store,
            schema,
            cache: ValidatorCache::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validates and writes `value` under `key`, optionally at an
    /// explicit position. Writing the absent marker deletes the key.
    pub async fn put(
        &self,
        key: &str,
        value: Value,
        position: Option<usize>,
    ) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        if is_absent(&value) {
            self.cache.validator_for(&self.schema, &key)?;
            return Ok(self.store.delete(key.joined()).await?);
        }
        let sanitized = checked_write_value(&self.schema, &self.cache, &key, &value)?;
        tracing::debug!(key = %key, position, "ordered dict put");
        Ok(self.store.put(key.joined(), sanitized, position).await?)
    }

    /// Reads the value and its current position.
    ///
    /// The position is the entry's index in enumeration order. A stored
    /// value that no longer matches the schema reads as `None`.
    pub async fn get(&self, key: &str) -> TypedResult<Option<(Value, usize)>> {
        let key = PathKey::parse(key)?;
        let validator = self.cache.validator_for(&self.schema, &key)?;
        let entries = self.store.entries().await?;
        let Some(position) = entries.iter().position(|e| e.key == key.joined()) else {
            return Ok(None);
        };
        let value = entries[position].value.clone();
        if validator.is_valid(&value) {
            Ok(Some((value, position)))
        } else {
            tracing::warn!(key = %key, "stored value no longer matches schema, reading as absent");
            Ok(None)
        }
    }

    /// Moves `key` to `position`. The key must exist in the schema.
    pub async fn move_entry(&self, key: &str, position: usize) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        self.cache.validator_for(&self.schema, &key)?;
        Ok(self.store.move_entry(key.joined(), position).await?)
    }

    /// Deletes `key`. Unsupported keys are rejected before the store is
    /// touched.
    pub async fn delete(&self, key: &str) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        self.cache.validator_for(&self.schema, &key)?;
        Ok(self.store.delete(key.joined()).await?)
    }

    /// All valid entries in store order; invalid entries are dropped
    /// silently. The ordered shape has no whole-structure read — order is
    /// part of the data, so the entry list is the canonical view.
    pub async fn all(&self) -> TypedResult<Vec<StoredEntry>> {
        let raw = self.store.entries().await?;
        Ok(raw
            .into_iter()
            .filter(|entry| entry_passes(&self.schema, &self.cache, entry))
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
