//! Facade Property Tests
//!
//! Randomized checks of the structural invariants:
//! - Key encodings convert without loss in both directions
//! - Sanitization is idempotent and leaves no absent object fields
//! - Resolution and the supported-key predicate always agree
//! - Validation is deterministic

use gatedb::key::PathKey;
use gatedb::schema::{resolve, supported_key, CompiledValidator, SchemaNode};
use gatedb::value::{is_absent, strip_absent};
use proptest::prelude::*;
use serde_json::{json, Value};

// =============================================================================
// Strategies
// =============================================================================

fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_segment(), 1..5)
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            proptest::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

// =============================================================================
// Key Properties
// =============================================================================

proptest! {
    /// Segments survive the joined encoding and back.
    #[test]
    fn prop_key_round_trip(segments in arb_segments()) {
        let key = PathKey::from_segments(segments.clone()).unwrap();
        let reparsed = PathKey::parse(key.joined()).unwrap();
        prop_assert_eq!(reparsed.segments(), segments.as_slice());
        prop_assert_eq!(&reparsed, &key);
    }

    /// The joined form contains exactly len - 1 separators.
    #[test]
    fn prop_joined_separator_count(segments in arb_segments()) {
        let key = PathKey::from_segments(segments).unwrap();
        let separators = key.joined().matches('/').count();
        prop_assert_eq!(separators, key.len() - 1);
    }
}

// =============================================================================
// Sanitization Properties
// =============================================================================

proptest! {
    /// Sanitizing twice changes nothing further.
    #[test]
    fn prop_strip_absent_idempotent(value in arb_json()) {
        let once = strip_absent(&value);
        let twice = strip_absent(&once);
        prop_assert_eq!(once, twice);
    }

    /// No object field of a sanitized value holds the absent marker, at
    /// any depth.
    #[test]
    fn prop_sanitized_has_no_absent_fields(value in arb_json()) {
        fn no_absent_fields(value: &Value) -> bool {
            match value {
                Value::Object(map) => map
                    .values()
                    .all(|v| !is_absent(v) && no_absent_fields(v)),
                Value::Array(items) => items.iter().all(no_absent_fields),
                _ => true,
            }
        }
        prop_assert!(no_absent_fields(&strip_absent(&value)));
    }
}

// =============================================================================
// Resolution Properties
// =============================================================================

fn reference_schema() -> SchemaNode {
    SchemaNode::object([
        ("a", SchemaNode::Number),
        (
            "b",
            SchemaNode::object([
                ("c", SchemaNode::String),
                ("d", SchemaNode::open_object::<&str, _>([], SchemaNode::Boolean)),
            ]),
        ),
    ])
}

proptest! {
    /// The predicate and the resolver never disagree.
    #[test]
    fn prop_supported_key_matches_resolve(segments in proptest::collection::vec("[a-d]", 1..4)) {
        let schema = reference_schema();
        let key = PathKey::from_segments(segments).unwrap();
        prop_assert_eq!(
            supported_key(&schema, &key),
            resolve(&schema, &key).is_supported()
        );
    }

    /// Validation of the same value is deterministic.
    #[test]
    fn prop_validation_deterministic(value in arb_json()) {
        let validator = CompiledValidator::for_node(&reference_schema());
        let first = validator.validate(&value);
        let second = validator.validate(&value);
        prop_assert_eq!(first, second);
    }
}

// =============================================================================
// Validation Consistency
// =============================================================================

proptest! {
    /// A sanitized value accepted for a declared field never contains the
    /// absent marker the validator would reject.
    #[test]
    fn prop_sanitize_never_invalidates_valid_object(
        n in any::<i64>(),
        s in "[a-z]{0,6}",
    ) {
        let schema = reference_schema();
        let validator = CompiledValidator::for_node(&schema);
        let value = json!({ "a": n, "b": { "c": s, "unset": null } });
        // Raw value fails (null field), sanitized value passes.
        prop_assert!(validator.validate(&value).is_err());
        prop_assert!(validator.validate(&strip_absent(&value)).is_ok());
    }
}
