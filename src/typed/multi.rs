//! Composite facade.
//!
//! A composite schema mixes plain value fields with embedded sub-stores
//! under one key space. The facade guards the plain fields itself; a
//! sub-store field is an opaque mount point whose contents live in a
//! separate store, so plain reads and writes are refused there.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::key::PathKey;
use crate::schema::{SchemaNode, ValidatorCache};
use crate::store::{Store, StoredEntry};
use crate::value::is_absent;

use super::errors::{TypedResult, TypedStoreError};
use super::{checked_write_value, entry_passes};

/// Shape of an embedded sub-store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    List,
    Set,
    Dict,
    OrderedDict,
    Nested,
}

impl StoreKind {
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::List => "list",
            StoreKind::Set => "set",
            StoreKind::Dict => "dict",
            StoreKind::OrderedDict => "ordered dict",
            StoreKind::Nested => "nested",
        }
    }
}

/// Composite schema: plain value branches interleaved with sub-store
/// mount points.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiSchema {
    /// A plain field governed by an ordinary schema node.
    Value(SchemaNode),
    /// An embedded sub-store. Opaque to the composite facade; its element
    /// schema belongs to the wrapper mounted there.
    Store(StoreKind),
    /// A level of named branches.
    Object(BTreeMap<String, MultiSchema>),
}

impl MultiSchema {
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MultiSchema)>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// The schema governing plain values, with sub-store mount points
    /// stripped out. `None` when every branch below is a mount point.
    fn to_value_schema(&self) -> Option<SchemaNode> {
        match self {
            MultiSchema::Value(node) => Some(node.clone()),
            MultiSchema::Store(_) => None,
            MultiSchema::Object(fields) => {
                let properties: BTreeMap<String, SchemaNode> = fields
                    .iter()
                    .filter_map(|(name, child)| {
                        child.to_value_schema().map(|node| (name.clone(), node))
                    })
                    .collect();
                Some(SchemaNode::Object {
                    properties,
                    additional: None,
                })
            }
        }
    }
}

/// Every declared path in a composite schema, at all levels.
///
/// Sub-store mount points appear as keys themselves but are never
/// descended into; what a sub-store contains is not part of the composite
/// key space.
pub fn extract_keys(schema: &MultiSchema) -> BTreeSet<PathKey> {
    let mut keys = BTreeSet::new();
    if let MultiSchema::Object(fields) = schema {
        for (name, child) in fields {
            if let Ok(key) = PathKey::parse(name) {
                collect_keys(child, &key, &mut keys);
            }
        }
    }
    keys
}

fn collect_keys(schema: &MultiSchema, at: &PathKey, keys: &mut BTreeSet<PathKey>) {
    keys.insert(at.clone());
    match schema {
        MultiSchema::Object(fields) => {
            for (name, child) in fields {
                if let Ok(key) = at.child(name) {
                    collect_keys(child, &key, keys);
                }
            }
        }
        MultiSchema::Value(SchemaNode::Object { properties, .. }) => {
            for name in properties.keys() {
                if let Ok(key) = at.child(name) {
                    keys.insert(key);
                }
            }
        }
        _ => {}
    }
}

/// Schema-guarded wrapper over a composite store.
///
/// Plain fields behave exactly like [`super::TypedDict`] entries. Keys at
/// or below a sub-store mount point are rejected with
/// [`TypedStoreError::UnsupportedOperation`]; those live in their own
/// store, mounted separately.
pub struct TypedMulti<S> {
    store: Arc<S>,
    schema: MultiSchema,
    value_schema: SchemaNode,
    cache: ValidatorCache,
    mounts: BTreeMap<PathKey, StoreKind>,
}

impl<S: Store> TypedMulti<S> {
    pub fn new(store: Arc<S>, schema: MultiSchema) -> Self {
        let value_schema = schema
            .to_value_schema()
            .unwrap_or(SchemaNode::Object {
                properties: BTreeMap::new(),
                additional: None,
            });
        let mut mounts = BTreeMap::new();
        collect_mounts(&schema, None, &mut mounts);
        Self {
            store,
            schema,
            value_schema,
            cache: ValidatorCache::new(),
            mounts,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn schema(&self) -> &MultiSchema {
        &self.schema
    }

    /// Every declared path, mount points included.
    pub fn keys(&self) -> BTreeSet<PathKey> {
        extract_keys(&self.schema)
    }

    /// The sub-store kind mounted at `key`, if any.
    pub fn store_kind(&self, key: &PathKey) -> Option<StoreKind> {
        self.mounts.get(key).copied()
    }

    /// The mount point covering `key`: either `key` itself or the nearest
    /// ancestor that is a mount point.
    fn covering_mount(&self, key: &PathKey) -> Option<(&PathKey, StoreKind)> {
        self.mounts.iter().find_map(|(mount, kind)| {
            let covered = key == mount
                || key
                    .joined()
                    .strip_prefix(mount.joined())
                    .is_some_and(|rest| rest.starts_with(crate::key::SEPARATOR));
            covered.then_some((mount, *kind))
        })
    }

    fn reject_mounted(&self, key: &PathKey) -> TypedResult<()> {
        if let Some((mount, kind)) = self.covering_mount(key) {
            return Err(TypedStoreError::UnsupportedOperation {
                key: key.joined().to_owned(),
                reason: format!("a {} sub-store is mounted at '{}'", kind.name(), mount),
            });
        }
        Ok(())
    }

    /// Validates and writes `value` under a plain field. Writing the
    /// absent marker deletes the key.
    pub async fn put(&self, key: &str, value: Value) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        self.reject_mounted(&key)?;
        if is_absent(&value) {
            self.cache.validator_for(&self.value_schema, &key)?;
            return Ok(self.store.delete(key.joined()).await?);
        }
        let sanitized = checked_write_value(&self.value_schema, &self.cache, &key, &value)?;
        tracing::debug!(key = %key, "composite put");
        Ok(self.store.put(key.joined(), sanitized, None).await?)
    }

    /// Reads a plain field, re-validating it against the schema.
    pub async fn get(&self, key: &str) -> TypedResult<Option<Value>> {
        let key = PathKey::parse(key)?;
        self.reject_mounted(&key)?;
        let validator = self.cache.validator_for(&self.value_schema, &key)?;
        match self.store.get(key.joined()).await? {
            None => Ok(None),
            Some(value) if validator.is_valid(&value) => Ok(Some(value)),
            Some(_) => {
                tracing::warn!(key = %key, "stored value no longer matches schema, reading as absent");
                Ok(None)
            }
        }
    }

    /// Deletes a plain field.
    pub async fn delete(&self, key: &str) -> TypedResult<String> {
        let key = PathKey::parse(key)?;
        self.reject_mounted(&key)?;
        self.cache.validator_for(&self.value_schema, &key)?;
        Ok(self.store.delete(key.joined()).await?)
    }

    /// All valid plain entries; entries failing their per-key validator
    /// are dropped silently.
    pub async fn entries(&self) -> TypedResult<Vec<StoredEntry>> {
        let raw = self.store.entries().await?;
        Ok(raw
            .into_iter()
            .filter(|entry| entry_passes(&self.value_schema, &self.cache, entry))
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

fn collect_mounts(
    schema: &MultiSchema,
    at: Option<&PathKey>,
    mounts: &mut BTreeMap<PathKey, StoreKind>,
) {
    match schema {
        MultiSchema::Store(kind) => {
            if let Some(key) = at {
                mounts.insert(key.clone(), *kind);
            }
        }
        MultiSchema::Object(fields) => {
            for (name, child) in fields {
                let key = match at {
                    Some(parent) => parent.child(name),
                    None => PathKey::parse(name),
                };
                if let Ok(key) = key {
                    collect_mounts(child, Some(&key), mounts);
                }
            }
        }
        MultiSchema::Value(_) => {}
    }
}
