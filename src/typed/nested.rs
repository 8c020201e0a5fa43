//! Nested tree facade.
//!
//! Deep keys address leaves of one logical tree; the store itself only
//! ever sees flat entries keyed by joined paths. Writing an object value
//! at an object-shaped branch fans out into one store operation per leaf,
//! so partial updates never clobber sibling fields.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::key::PathKey;
use crate::schema::{
    json_type_name, resolve, CompiledValidator, Resolution, SchemaBranch, SchemaError, SchemaNode,
    ValidatorCache, Violation,
};
use crate::store::{Store, StoredEntry};
use crate::value::is_absent;

use super::errors::{TypedResult, TypedStoreError};
use super::{checked_write_value, entry_passes, insert_at};

/// One store operation produced by planning a nested write.
///
/// Planning is synchronous and complete before the first store call, so a
/// write that would touch an unsupported path or an invalid value fails
/// before anything is persisted.
#[derive(Debug, Clone, PartialEq)]
enum WriteOp {
    Put(PathKey, Value),
    Delete(PathKey),
}

/// Schema-guarded wrapper over a tree-shaped store.
///
/// Keys may be any depth; intermediate levels exist only in the schema
/// and in assembled reads. Fan-out writes are sequential, not atomic: a
/// failing store call leaves earlier leaf writes in place.
pub struct TypedNested<S> {
    store: Arc<S>,
    schema: SchemaNode,
    cache: ValidatorCache,
    root_validator: CompiledValidator,
}

impl<S: Store> TypedNested<S> {
    pub fn new(store: Arc<S>, schema: SchemaNode) -> Self {
        let root_validator = CompiledValidator::for_node(&schema);
        Self {
            store,
            schema,
            cache: ValidatorCache::new(),
            root_validator,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Validates and writes `value` at `key`, returning the identifiers of
    /// every store operation performed.
    ///
    /// An object value at an object-shaped branch recurses field by field;
    /// anything else is written as one leaf. The absent marker deletes the
    /// subtree at its path.
    pub async fn put(&self, key: &str, value: Value) -> TypedResult<Vec<String>> {
        let key = PathKey::parse(key)?;
        let mut ops = Vec::new();
        self.plan(&key, &value, &mut ops)?;
        self.execute(ops).await
    }

    /// Validates and writes a partial tree rooted at the top of the key
    /// space, returning one identifier per leaf operation.
    ///
    /// Each top-level field fans out exactly as a [`put`](Self::put) at
    /// that field would; absent-marker leaves prune their subtrees. The
    /// value must be an object, since only named fields exist at the root.
    pub async fn put_nested(&self, value: Value) -> TypedResult<Vec<String>> {
        let Value::Object(fields) = &value else {
            return Err(SchemaError::validation_failed(
                "$root",
                vec![Violation::new("$root", "must be object", json_type_name(&value))],
            )
            .into());
        };

        let mut ops = Vec::new();
        for (field, child) in fields {
            let key = PathKey::parse(field)?;
            self.plan(&key, child, &mut ops)?;
        }
        self.execute(ops).await
    }

    async fn execute(&self, ops: Vec<WriteOp>) -> TypedResult<Vec<String>> {
        let mut ids = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                WriteOp::Put(k, v) => {
                    tracing::debug!(key = %k, "nested put");
                    ids.push(self.store.put(k.joined(), v, None).await?);
                }
                WriteOp::Delete(k) => {
                    ids.extend(self.delete_subtree(&k).await?);
                }
            }
        }
        Ok(ids)
    }

    fn plan(&self, key: &PathKey, value: &Value, ops: &mut Vec<WriteOp>) -> TypedResult<()> {
        if is_absent(value) {
            // Deleting still requires the path to exist in the schema.
            self.cache.validator_for(&self.schema, key)?;
            ops.push(WriteOp::Delete(key.clone()));
            return Ok(());
        }

        if let Value::Object(fields) = value {
            let branch_is_object = matches!(
                resolve(&self.schema, key),
                Resolution::Branch(SchemaBranch::Node {
                    node: SchemaNode::Object { .. },
                    ..
                })
            );
            if branch_is_object {
                for (field, child) in fields {
                    let child_key = key.child(field)?;
                    self.plan(&child_key, child, ops)?;
                }
                return Ok(());
            }
        }

        let sanitized = checked_write_value(&self.schema, &self.cache, key, value)?;
        ops.push(WriteOp::Put(key.clone(), sanitized));
        Ok(())
    }

    /// Reads the value at `key`.
    ///
    /// A leaf stored directly under the key is returned as-is (re-validated
    /// against its branch). Otherwise the subtree is assembled from every
    /// valid entry below the key, and `None` means nothing is stored there.
    pub async fn get(&self, key: &str) -> TypedResult<Option<Value>> {
        let key = PathKey::parse(key)?;
        let validator = self.cache.validator_for(&self.schema, &key)?;

        if let Some(value) = self.store.get(key.joined()).await? {
            if validator.is_valid(&value) {
                return Ok(Some(value));
            }
            tracing::warn!(key = %key, "stored value no longer matches schema, reading as absent");
            return Ok(None);
        }

        let prefix = format!("{}{}", key.joined(), crate::key::SEPARATOR);
        let mut subtree = Map::new();
        let mut found = false;
        for entry in self.store.entries().await? {
            let Some(relative) = entry.key.strip_prefix(&prefix) else {
                continue;
            };
            if !entry_passes(&self.schema, &self.cache, &entry) {
                continue;
            }
            let Ok(relative) = PathKey::parse(relative) else {
                continue;
            };
            insert_at(&mut subtree, relative.segments(), entry.value);
            found = true;
        }
        if found {
            Ok(Some(Value::Object(subtree)))
        } else {
            Ok(None)
        }
    }

    /// Deletes the value at `key` and everything stored below it.
    pub async fn delete(&self, key: &str) -> TypedResult<Vec<String>> {
        let key = PathKey::parse(key)?;
        self.cache.validator_for(&self.schema, &key)?;
        self.delete_subtree(&key).await
    }

    async fn delete_subtree(&self, key: &PathKey) -> TypedResult<Vec<String>> {
        let prefix = format!("{}{}", key.joined(), crate::key::SEPARATOR);
        let mut ids = vec![self.store.delete(key.joined()).await?];
        for entry in self.store.entries().await? {
            if entry.key.starts_with(&prefix) {
                ids.push(self.store.delete(&entry.key).await?);
            }
        }
        Ok(ids)
    }

    /// All valid flat entries, keyed by joined path; invalid entries are
    /// dropped silently.
    pub async fn entries(&self) -> TypedResult<Vec<StoredEntry>> {
        let raw = self.store.entries().await?;
        Ok(raw
            .into_iter()
            .filter(|entry| entry_passes(&self.schema, &self.cache, entry))
            .collect())
    }

    /// The whole tree assembled into one value and validated against the
    /// root schema.
    ///
    /// Unlike [`entries`](Self::entries), this fails entirely when any
    /// stored fragment cannot take its place in a consistent tree.
    pub async fn all_as_json(&self) -> TypedResult<Map<String, Value>> {
        let raw = self.store.entries().await?;
        let mut tree = Map::new();
        for entry in raw {
            let Ok(key) = PathKey::parse(&entry.key) else {
                return Err(TypedStoreError::ReadInconsistency(vec![Violation::new(
                    entry.key,
                    "must be a well-formed path",
                    "malformed key",
                )]));
            };
            insert_at(&mut tree, key.segments(), entry.value);
        }
        self.root_validator
            .validate(&Value::Object(tree.clone()))
            .map_err(TypedStoreError::ReadInconsistency)?;
        Ok(tree)
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
