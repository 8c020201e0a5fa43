//! Typed store facades.
//!
//! One wrapper per store shape, each composing the same primitives: key
//! normalization, schema resolution, per-path validator caching and
//! value sanitization, in front of an abstract [`crate::store::Store`].
//! The facades delegate by explicit forwarding — lifecycle calls and the
//! raw store handle are exposed directly; nothing is intercepted at
//! runtime.
//!
//! Read policies differ deliberately:
//! - per-key reads treat a stored value that no longer matches its schema
//!   as absent (legacy data must not crash readers);
//! - enumeration drops invalid entries silently (the underlying log may
//!   contain foreign or legacy writes);
//! - whole-structure reads fail with
//!   [`TypedStoreError::ReadInconsistency`], because a partial tree
//!   cannot be repaired without guessing which branch to drop.

pub mod dict;
pub mod errors;
pub mod list;
pub mod multi;
pub mod nested;
pub mod ordered;
pub mod set;

pub use dict::TypedDict;
pub use errors::{TypedResult, TypedStoreError};
pub use list::TypedList;
pub use multi::{extract_keys, MultiSchema, StoreKind, TypedMulti};
pub use nested::TypedNested;
pub use ordered::TypedOrderedDict;
pub use set::TypedSet;

use serde_json::{Map, Value};

use crate::key::PathKey;
use crate::schema::{SchemaError, SchemaNode, ValidatorCache};
use crate::store::StoredEntry;
use crate::value::strip_absent;

/// Sanitizes and validates a value for a write at `key`.
///
/// Returns the sanitized value ready to forward to the store, or the
/// error to surface: `UnsupportedKey` when the key is not in the schema,
/// `ValidationFailed` when the value is rejected.
pub(crate) fn checked_write_value(
    schema: &SchemaNode,
    cache: &ValidatorCache,
    key: &PathKey,
    value: &Value,
) -> TypedResult<Value> {
    let sanitized = strip_absent(value);
    let validator = cache.validator_for(schema, key)?;
    validator
        .validate(&sanitized)
        .map_err(|violations| SchemaError::validation_failed(key.joined(), violations))?;
    Ok(sanitized)
}

/// Per-entry enumeration filter: an entry is kept only if its key
/// normalizes, resolves and its value validates. Dropped entries are
/// logged, never surfaced.
pub(crate) fn entry_passes(
    schema: &SchemaNode,
    cache: &ValidatorCache,
    entry: &StoredEntry,
) -> bool {
    let Ok(key) = PathKey::parse(&entry.key) else {
        tracing::warn!(key = %entry.key, "dropping entry with malformed key");
        return false;
    };
    let Ok(validator) = cache.validator_for(schema, &key) else {
        tracing::warn!(key = %entry.key, "dropping entry with unsupported key");
        return false;
    };
    if validator.is_valid(&entry.value) {
        true
    } else {
        tracing::warn!(key = %entry.key, "dropping entry with schema-violating value");
        false
    }
}

/// Inserts `value` at the location named by `segments`, creating
/// intermediate objects as needed. A deeper write wins over a leaf that
/// shadows its path; two object values at the same location merge field
/// by field. Used by the whole-structure reads to rebuild nested maps
/// from flat entries.
pub(crate) fn insert_at(tree: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        match (tree.get_mut(first), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (field, child) in incoming {
                    insert_at(existing, &[field], child);
                }
            }
            (_, value) => {
                tree.insert(first.clone(), value);
            }
        }
        return;
    }

    let slot = tree
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !matches!(slot, Value::Object(_)) {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(inner) = slot {
        insert_at(inner, rest, value);
    }
}
