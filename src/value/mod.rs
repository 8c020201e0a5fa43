//! Value sanitization.
//!
//! Optional fields are deleted from a structured value by omission, not by
//! an explicit null: a map entry holding the absent marker means "this
//! field is not set". The validator has no notion of absent-vs-omitted, so
//! every write path strips absent entries first.

use serde_json::Value;

/// Whether `value` is the absent-field marker.
pub fn is_absent(value: &Value) -> bool {
    value.is_null()
}

/// Returns a copy of `value` with every map entry holding the absent
/// marker removed, recursively at every depth.
///
/// List elements are each sanitized but never removed; an absent marker
/// inside a list is a value-level concern for the validator, not an
/// omitted field. Scalars pass through unchanged. The input is never
/// mutated.
pub fn strip_absent(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !is_absent(v))
                .map(|(k, v)| (k.clone(), strip_absent(v)))
                .collect(),
        ),
        Value::Array(elements) => Value::Array(elements.iter().map(strip_absent).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_top_level_absent_field() {
        let stripped = strip_absent(&json!({ "a": 2, "b": null }));
        assert_eq!(stripped, json!({ "a": 2 }));
    }

    #[test]
    fn test_strips_nested_absent_field() {
        let stripped = strip_absent(&json!({ "a": { "b": null, "c": 2 } }));
        assert_eq!(stripped, json!({ "a": { "c": 2 } }));
    }

    #[test]
    fn test_list_elements_sanitized_but_kept() {
        let stripped = strip_absent(&json!([{ "a": null, "b": 1 }, null, 3]));
        assert_eq!(stripped, json!([{ "b": 1 }, null, 3]));
    }

    #[test]
    fn test_scalars_unchanged() {
        for v in [json!(1), json!("x"), json!(true), json!(null)] {
            assert_eq!(strip_absent(&v), v);
        }
    }

    #[test]
    fn test_idempotent() {
        let value = json!({ "a": { "b": null }, "c": [null, { "d": null }] });
        let once = strip_absent(&value);
        let twice = strip_absent(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_not_mutated() {
        let value = json!({ "a": null });
        let _ = strip_absent(&value);
        assert_eq!(value, json!({ "a": null }));
    }
}
