//! In-memory reference store.
//!
//! An ordered, schema-unaware [`Store`] used by tests and examples. It
//! assigns sequential opaque identifiers and keeps entries in insertion
//! order unless a position is given. Not durable; a real deployment wires
//! the facades to a persistent collaborator instead.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::{Store, StoredEntry};

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<StoredEntry>,
    next_id: u64,
}

impl Inner {
    fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("op-{}", self.next_id)
    }
}

/// Ordered in-memory store implementing every shape's entry points.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, key: &str, value: Value, position: Option<usize>) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        let id = inner.mint_id();
        let entry = StoredEntry {
            key: key.to_owned(),
            value,
            id: id.clone(),
        };
        let existing = inner.entries.iter().position(|e| e.key == key);
        match (existing, position) {
            (Some(index), None) => inner.entries[index] = entry,
            (Some(index), Some(target)) => {
                inner.entries.remove(index);
                let target = target.min(inner.entries.len());
                inner.entries.insert(target, entry);
            }
            (None, Some(target)) => {
                let target = target.min(inner.entries.len());
                inner.entries.insert(target, entry);
            }
            (None, None) => inner.entries.push(entry),
        }
        Ok(id)
    }

    async fn append(&self, value: Value) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        let id = inner.mint_id();
        inner.entries.push(StoredEntry {
            key: id.clone(),
            value,
            id: id.clone(),
        });
        Ok(id)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let inner = self.inner.lock();
        Ok(inner
            .entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        inner.entries.retain(|e| e.key != key);
        Ok(inner.mint_id())
    }

    async fn entries(&self) -> StoreResult<Vec<StoredEntry>> {
        Ok(self.inner.lock().entries.clone())
    }

    async fn move_entry(&self, key: &str, position: usize) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        let Some(index) = inner.entries.iter().position(|e| e.key == key) else {
            return Err(StoreError::UnknownKey(key.to_owned()));
        };
        let entry = inner.entries.remove(index);
        let target = position.min(inner.entries.len());
        inner.entries.insert(target, entry);
        Ok(inner.mint_id())
    }

    async fn destroy(&self) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        Ok(())
    }
}
