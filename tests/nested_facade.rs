//! Nested Tree Facade Tests
//!
//! End-to-end behavior of the tree wrapper:
//! - Object writes fan out into per-leaf store operations
//! - Partial updates never clobber sibling fields
//! - Subtree reads assemble from flat entries
//! - The absent marker prunes subtrees
//! - Whole-tree reads are all-or-nothing

use gatedb::schema::SchemaNode;
use gatedb::store::{MemoryStore, Store};
use gatedb::typed::{TypedNested, TypedStoreError};
use serde_json::{json, Value};
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

fn device_schema() -> SchemaNode {
    SchemaNode::object([
        ("name", SchemaNode::String),
        (
            "config",
            SchemaNode::object([
                ("retries", SchemaNode::Number),
                ("verbose", SchemaNode::Boolean),
            ]),
        ),
    ])
}

fn nested() -> TypedNested<MemoryStore> {
    TypedNested::new(Arc::new(MemoryStore::new()), device_schema())
}

// =============================================================================
// Fan-Out Write Tests
// =============================================================================

/// Writing an object at an object-shaped branch stores one entry per leaf.
#[tokio::test]
async fn test_object_write_fans_out() {
    let nested = nested();
    let ids = nested
        .put("config", json!({ "retries": 3, "verbose": true }))
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let keys: Vec<_> = nested
        .entries()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    assert!(keys.contains(&"config/retries".to_string()));
    assert!(keys.contains(&"config/verbose".to_string()));
}

/// A later partial write leaves sibling leaves untouched.
#[tokio::test]
async fn test_partial_update_preserves_siblings() {
    let nested = nested();
    nested
        .put("config", json!({ "retries": 3, "verbose": true }))
        .await
        .unwrap();
    nested.put("config", json!({ "retries": 5 })).await.unwrap();
    assert_eq!(
        nested.get("config").await.unwrap(),
        Some(json!({ "retries": 5, "verbose": true }))
    );
}

/// A deep key writes one leaf directly.
#[tokio::test]
async fn test_deep_key_leaf_write() {
    let nested = nested();
    nested.put("config/retries", json!(3)).await.unwrap();
    assert_eq!(nested.get("config/retries").await.unwrap(), Some(json!(3)));
}

/// An invalid leaf anywhere in the object fails the whole write before
/// any store call.
#[tokio::test]
async fn test_invalid_leaf_fails_whole_write() {
    let nested = nested();
    let err = nested
        .put("config", json!({ "retries": 3, "verbose": "yes" }))
        .await
        .unwrap_err();
    assert!(err.is_validation_failure());
    assert!(nested.store().is_empty());
}

/// An unsupported leaf inside the object fails the whole write.
#[tokio::test]
async fn test_unsupported_leaf_fails_whole_write() {
    let nested = nested();
    let err = nested
        .put("config", json!({ "retries": 3, "color": "red" }))
        .await
        .unwrap_err();
    assert!(err.is_unsupported_key());
    assert!(nested.store().is_empty());
}

// =============================================================================
// Root Partial-Tree Write Tests
// =============================================================================

/// put_nested writes a whole partial tree in one call, one id per leaf.
#[tokio::test]
async fn test_put_nested_writes_partial_tree() {
    let nested = nested();
    let ids = nested
        .put_nested(json!({ "name": "router", "config": { "retries": 3 } }))
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(nested.get("name").await.unwrap(), Some(json!("router")));
    assert_eq!(nested.get("config/retries").await.unwrap(), Some(json!(3)));
}

/// put_nested validates every leaf before any store call.
#[tokio::test]
async fn test_put_nested_rejects_invalid_leaf() {
    let nested = nested();
    let err = nested
        .put_nested(json!({ "name": "router", "config": { "retries": "many" } }))
        .await
        .unwrap_err();
    assert!(err.is_validation_failure());
    assert!(nested.store().is_empty());
}

/// An absent-marker leaf in the partial tree prunes that subtree.
#[tokio::test]
async fn test_put_nested_absent_leaf_prunes() {
    let nested = nested();
    nested
        .put_nested(json!({ "name": "router", "config": { "retries": 3 } }))
        .await
        .unwrap();
    nested.put_nested(json!({ "config": null })).await.unwrap();
    assert_eq!(nested.get("config").await.unwrap(), None);
    assert_eq!(nested.get("name").await.unwrap(), Some(json!("router")));
}

/// A non-object value has no place at the root of the key space.
#[tokio::test]
async fn test_put_nested_rejects_non_object() {
    let nested = nested();
    let err = nested.put_nested(json!(42)).await.unwrap_err();
    assert!(err.is_validation_failure());
    assert!(err.to_string().contains("must be object"));
}

// =============================================================================
// Pruning Tests
// =============================================================================

/// The absent marker at a branch deletes everything below it.
#[tokio::test]
async fn test_absent_prunes_subtree() {
    let nested = nested();
    nested
        .put("config", json!({ "retries": 3, "verbose": true }))
        .await
        .unwrap();
    nested.put("name", json!("router")).await.unwrap();

    nested.put("config", json!(null)).await.unwrap();
    assert_eq!(nested.get("config").await.unwrap(), None);
    assert_eq!(nested.get("name").await.unwrap(), Some(json!("router")));
}

/// An absent leaf inside an object write deletes just that leaf.
#[tokio::test]
async fn test_absent_leaf_deletes_field() {
    let nested = nested();
    nested
        .put("config", json!({ "retries": 3, "verbose": true }))
        .await
        .unwrap();
    nested.put("config", json!({ "verbose": null })).await.unwrap();
    assert_eq!(
        nested.get("config").await.unwrap(),
        Some(json!({ "retries": 3 }))
    );
}

/// delete removes the subtree like an absent write.
#[tokio::test]
async fn test_delete_subtree() {
    let nested = nested();
    nested
        .put("config", json!({ "retries": 3, "verbose": true }))
        .await
        .unwrap();
    nested.delete("config").await.unwrap();
    assert_eq!(nested.get("config").await.unwrap(), None);
}

// =============================================================================
// Assembled Read Tests
// =============================================================================

/// Reading an intermediate key assembles the subtree from flat entries.
#[tokio::test]
async fn test_get_assembles_subtree() {
    let nested = nested();
    nested.put("config/retries", json!(3)).await.unwrap();
    nested.put("config/verbose", json!(false)).await.unwrap();
    assert_eq!(
        nested.get("config").await.unwrap(),
        Some(json!({ "retries": 3, "verbose": false }))
    );
}

/// The whole tree assembles and validates against the root schema.
#[tokio::test]
async fn test_all_as_json_assembles_tree() {
    let nested = nested();
    nested.put("name", json!("router")).await.unwrap();
    nested.put("config/retries", json!(3)).await.unwrap();

    let tree = nested.all_as_json().await.unwrap();
    assert_eq!(
        Value::Object(tree),
        json!({ "name": "router", "config": { "retries": 3 } })
    );
}

/// A foreign fragment fails the whole-tree read but not enumeration.
#[tokio::test]
async fn test_all_as_json_fails_on_foreign_fragment() {
    let store = Arc::new(MemoryStore::new());
    store.put("name", json!("router"), None).await.unwrap();
    store.put("foreign/leaf", json!(1), None).await.unwrap();
    let nested = TypedNested::new(store, device_schema());

    assert_eq!(nested.entries().await.unwrap().len(), 1);
    let err = nested.all_as_json().await.unwrap_err();
    assert!(matches!(err, TypedStoreError::ReadInconsistency(_)));
}
