//! Flat dictionary facade.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::key::PathKey;
use crate::schema::{CompiledValidator, SchemaNode, ValidatorCache, Violation};
use crate::store::{Store, StoredEntry};
use crate::value::is_absent;

use super::errors::{TypedResult, TypedStoreError};
use super::{checked_write_value, entry_passes, insert_at};

/// Schema-guarded wrapper over a dictionary-shaped store.
///
/// Keys are field names of the root object schema (or arbitrary names
/// when the schema declares a wildcard). The schema is immutable for the
/// wrapper's lifetime and owns the per-path validator cache.
pub struct TypedDict<S> {
    store: Arc<S>,
    schema: SchemaNode,
    cache: ValidatorCache,
    root_validator: CompiledValidator,
}

impl<S: Store> TypedDict<S> {
    pub fn new(store: Arc<S>, schema: SchemaNode) -> Self {
        let root_validator = CompiledValidator::for_node(&schema);
        Self {
            store,
            schema,
            cache: ValidatorCache::new(),
            root_validator,
        }
    }

    /// The underlying store, for operations the facade does not guard.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validates and writes `value` under `key`.
    ///
    /// Writing the absent marker deletes the key: omission is how a field
    /// is unset in this model.
    pub async fn put(&self, key: &str, value: Value) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        if is_absent(&value) {
            self.cache.validator_for(&self.schema, &key)?;
            return Ok(self.store.delete(key.joined()).await?);
        }
        let sanitized = checked_write_value(&self.schema, &self.cache, &key, &value)?;
        tracing::debug!(key = %key, "dict put");
        Ok(self.store.put(key.joined(), sanitized, None).await?)
    }

    /// Reads the value at `key`, re-validating it against the schema.
    ///
    /// An unsupported key is an error; a stored value that no longer
    /// matches the schema reads as `None`.
    pub async fn get(&self, key: &str) -> TypedResult<Option<Value>> {
        let key = PathKey::parse(key)?;
        let validator = self.cache.validator_for(&self.schema, &key)?;
        match self.store.get(key.joined()).await? {
            None => Ok(None),
            Some(value) if validator.is_valid(&value) => Ok(Some(value)),
            Some(_) => {
                tracing::warn!(key = %key, "stored value no longer matches schema, reading as absent");
                Ok(None)
            }
        }
    }

    /// Deletes `key`. Unsupported keys are rejected before the store is
    /// touched.
    pub async fn delete(&self, key: &str) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        self.cache.validator_for(&self.schema, &key)?;
        Ok(self.store.delete(key.joined()).await?)
    }

    /// All valid entries; entries failing their per-key validator are
    /// dropped silently.
    pub async fn entries(&self) -> TypedResult<Vec<StoredEntry>> {
        let raw = self.store.entries().await?;
        Ok(raw
            .into_iter()
            .filter(|entry| entry_passes(&self.schema, &self.cache, entry))
            .collect())
    }

    /// The whole dictionary as one map, validated against the root
    /// schema. Multi-segment keys nest, so the reconstruction mirrors
    /// the object shape the schema declares.
    ///
    /// Unlike [`entries`](Self::entries), this fails entirely when any
    /// stored fragment violates the schema: a whole-structure read must
    /// be internally consistent.
    pub async fn all_as_json(&self) -> TypedResult<Map<String, Value>> {
        let raw = self.store.entries().await?;
        let mut map = Map::new();
        for entry in raw {
            let Ok(key) = PathKey::parse(&entry.key) else {
                return Err(TypedStoreError::ReadInconsistency(vec![Violation::new(
                    entry.key,
                    "must be a well-formed path",
                    "malformed key",
                )]));
            };
            insert_at(&mut map, key.segments(), entry.value);
        }
        self.root_validator
            .validate(&Value::Object(map.clone()))
            .map_err(TypedStoreError::ReadInconsistency)?;
        Ok(map)
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
