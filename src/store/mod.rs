//! The abstract store capability.
//!
//! The typed facades never perform I/O themselves; they consume this
//! interface from an external collaborator that owns durability,
//! replication and transport. Everything the facades add — key
//! normalization, schema resolution, validation, sanitization — happens
//! before or after these calls.

pub mod errors;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

/// One raw entry from a store enumeration: key, value, and the opaque
/// content identifier assigned by the store. The identifier is passed
/// through untouched; the facades never interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub key: String,
    pub value: Value,
    pub id: String,
}

/// The persistence collaborator consumed by every typed facade.
///
/// All methods suspend only inside the store; the facades' own logic is
/// synchronous. `append` is the entry point of the list/set shapes and
/// `move_entry` of the ordered-dictionary shape; stores of other shapes
/// keep the default unsupported implementations.
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes `value` under `key`, returning the new content identifier.
    /// Ordered stores honor `position`.
    async fn put(&self, key: &str, value: Value, position: Option<usize>) -> StoreResult<String>;

    /// Appends an entry keyed by the store itself (list/set shapes).
    async fn append(&self, _value: Value) -> StoreResult<String> {
        Err(StoreError::Unsupported("append"))
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Removes `key`, returning the identifier of the removal operation.
    async fn delete(&self, key: &str) -> StoreResult<String>;

    /// All raw entries, in store order. Finite and restartable: callers
    /// may re-invoke at any time.
    async fn entries(&self) -> StoreResult<Vec<StoredEntry>>;

    /// Moves `key` to `position` (ordered-dictionary shape).
    async fn move_entry(&self, _key: &str, _position: usize) -> StoreResult<String> {
        Err(StoreError::Unsupported("move_entry"))
    }

    // Lifecycle, forwarded verbatim by the facades.

    async fn open(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Drops all contents of the store.
    async fn destroy(&self) -> StoreResult<()> {
        Ok(())
    }
}
