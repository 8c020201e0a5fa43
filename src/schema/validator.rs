//! Compiled value validators.
//!
//! A [`CompiledValidator`] classifies a candidate value as valid or
//! invalid for one schema branch and, on rejection, exposes the list of
//! structured [`Violation`]s. Validators are pure and interchangeable;
//! the per-path cache in [`super::cache`] memoizes them.
//!
//! Validation semantics:
//! - Declared object fields are all optional; missing fields never fail.
//! - Undeclared fields fail unless a wildcard branch admits them.
//! - Types match exactly; there is no coercion.
//! - `null` matches no schema node (absence is expressed by omission).

use serde_json::Value;
use std::fmt;

use super::tree::SchemaBranch;
use super::types::{SchemaNode, Wildcard};

/// One rule violated by a candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path of the offending field within the value (e.g. "user.address"
    /// or "tags[1]"; "$root" for the value itself)
    pub path: String,
    /// The rule violated, phrased as a requirement
    pub rule: String,
    /// Summary of the actual value found
    pub actual: String,
}

impl Violation {
    pub fn new(
        path: impl Into<String>,
        rule: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            rule: rule.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {} (got {})", self.path, self.rule, self.actual)
    }
}

/// Renders a violation list for error messages.
pub fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A compiled predicate over values for one schema branch.
///
/// Compilation clones the branch schema so the validator holds no borrow
/// of the owning store wrapper. An always-valid branch (a wildcard whose
/// value is the literal allow-anything marker) compiles to a constant-true
/// predicate without running the structural checker.
#[derive(Debug, Clone)]
pub struct CompiledValidator {
    program: Program,
}

#[derive(Debug, Clone)]
enum Program {
    AlwaysValid,
    Node(SchemaNode),
}

impl CompiledValidator {
    /// Compiles a resolved schema branch.
    pub fn compile(branch: &SchemaBranch<'_>) -> Self {
        match branch {
            SchemaBranch::AnyValue => Self::always_valid(),
            SchemaBranch::Node { node, .. } => Self::for_node(node),
        }
    }

    /// Compiles a schema node directly (used for root validators).
    pub fn for_node(node: &SchemaNode) -> Self {
        Self {
            program: Program::Node(node.clone()),
        }
    }

    /// The constant-true predicate.
    pub fn always_valid() -> Self {
        Self {
            program: Program::AlwaysValid,
        }
    }

    /// Classifies `value`, returning every violation found.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<Violation>> {
        match &self.program {
            Program::AlwaysValid => Ok(()),
            Program::Node(node) => {
                let mut violations = Vec::new();
                check(node, value, "$root", &mut violations);
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    }

    /// Boolean form of [`validate`](Self::validate).
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }
}

fn check(node: &SchemaNode, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match node {
        SchemaNode::Number => {
            if !value.is_number() {
                out.push(type_violation(path, "number", value));
            }
        }
        SchemaNode::Integer => {
            if !value.is_i64() && !value.is_u64() {
                out.push(type_violation(path, "integer", value));
            }
        }
        SchemaNode::Boolean => {
            if !value.is_boolean() {
                out.push(type_violation(path, "boolean", value));
            }
        }
        SchemaNode::String => {
            if !value.is_string() {
                out.push(type_violation(path, "string", value));
            }
        }
        SchemaNode::Object {
            properties,
            additional,
        } => {
            let Some(map) = value.as_object() else {
                out.push(type_violation(path, "object", value));
                return;
            };
            for (field, child_value) in map {
                let child_path = make_path(path, field);
                if let Some(child_schema) = properties.get(field) {
                    check(child_schema, child_value, &child_path, out);
                    continue;
                }
                match additional {
                    Some(Wildcard::Allow(true)) => {}
                    Some(Wildcard::Node(child_schema)) => {
                        check(child_schema, child_value, &child_path, out);
                    }
                    Some(Wildcard::Allow(false)) | None => {
                        out.push(Violation::new(
                            child_path,
                            "must NOT have additional properties",
                            json_type_name(child_value),
                        ));
                    }
                }
            }
        }
        SchemaNode::Array { items } => {
            let Some(elements) = value.as_array() else {
                out.push(type_violation(path, "array", value));
                return;
            };
            for (i, element) in elements.iter().enumerate() {
                check(items, element, &format!("{path}[{i}]"), out);
            }
        }
        SchemaNode::Union { variants } => {
            let matches_any = variants.iter().any(|variant| {
                let mut scratch = Vec::new();
                check(variant, value, path, &mut scratch);
                scratch.is_empty()
            });
            if !matches_any {
                let expected = variants
                    .iter()
                    .map(SchemaNode::type_name)
                    .collect::<Vec<_>>()
                    .join(" or ");
                out.push(Violation::new(
                    path,
                    format!("must be {expected}"),
                    json_type_name(value),
                ));
            }
        }
    }
}

fn type_violation(path: &str, expected: &str, value: &Value) -> Violation {
    Violation::new(path, format!("must be {expected}"), json_type_name(value))
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix == "$root" {
        field.to_owned()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
