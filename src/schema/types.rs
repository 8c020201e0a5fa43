//! Schema type definitions.
//!
//! A schema is a recursive, immutable description of permitted value
//! shapes. It is the single source of truth for which keys exist in a
//! store wrapper and what values each path accepts. Schemas are supplied
//! in-process as data; the serde representation mirrors the usual
//! JSON-Schema spelling (`type`, `properties`, `additionalProperties`,
//! `items`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node in the schema tree.
///
/// Fields of an object node are all optional: omitting a declared field is
/// how a value expresses "not set". There is no `required` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    /// Any JSON number, integral or floating point
    Number,
    /// 64-bit integer only
    Integer,
    /// Boolean
    Boolean,
    /// UTF-8 string
    String,
    /// Object with explicitly declared fields and an optional wildcard
    /// branch applying to any field name not listed
    Object {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        properties: BTreeMap<std::string::String, SchemaNode>,
        #[serde(
            default,
            rename = "additionalProperties",
            skip_serializing_if = "Option::is_none"
        )]
        additional: Option<Wildcard>,
    },
    /// Homogeneous array with a single element schema
    Array { items: Box<SchemaNode> },
    /// Union: a value must match at least one variant
    Union { variants: Vec<SchemaNode> },
}

/// The wildcard ("additional properties") branch of an object node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Wildcard {
    /// `true` admits any value under any undeclared field name; `false`
    /// behaves as if no wildcard was declared.
    Allow(bool),
    /// Undeclared fields must match this schema.
    Node(Box<SchemaNode>),
}

impl SchemaNode {
    /// Closed object node from an iterator of field definitions.
    pub fn object<K, I>(properties: I) -> Self
    where
        K: Into<std::string::String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            additional: None,
        }
    }

    /// Object node whose undeclared fields must match `additional`.
    pub fn open_object<K, I>(properties: I, additional: SchemaNode) -> Self
    where
        K: Into<std::string::String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            additional: Some(Wildcard::Node(Box::new(additional))),
        }
    }

    /// Object node whose undeclared fields may hold any value.
    pub fn any_object<K, I>(properties: I) -> Self
    where
        K: Into<std::string::String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            additional: Some(Wildcard::Allow(true)),
        }
    }

    /// Array node with the given element schema.
    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array {
            items: Box::new(items),
        }
    }

    /// Union node over the given variants.
    pub fn union<I: IntoIterator<Item = SchemaNode>>(variants: I) -> Self {
        SchemaNode::Union {
            variants: variants.into_iter().collect(),
        }
    }

    /// Returns the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Number => "number",
            SchemaNode::Integer => "integer",
            SchemaNode::Boolean => "boolean",
            SchemaNode::String => "string",
            SchemaNode::Object { .. } => "object",
            SchemaNode::Array { .. } => "array",
            SchemaNode::Union { .. } => "union",
        }
    }
}

impl Wildcard {
    /// Whether this wildcard admits anything at all. `Allow(false)` is the
    /// same as declaring no wildcard.
    pub fn is_active(&self) -> bool {
        !matches!(self, Wildcard::Allow(false))
    }
}
