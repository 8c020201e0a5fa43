//! Schema tree resolution.
//!
//! [`resolve`] walks a schema definition along a [`PathKey`] and returns
//! the sub-schema governing that path, or [`Resolution::Unsupported`] when
//! the path has no matching branch and no wildcard ancestor. Explicit
//! `properties` are always consulted before the wildcard branch, at every
//! level, so a wildcard can never mask an explicitly declared field.

use crate::key::PathKey;

use super::types::{SchemaNode, Wildcard};

/// Outcome of resolving a key against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Branch(SchemaBranch<'a>),
    /// The key does not exist in the schema.
    Unsupported,
}

/// The sub-schema reached by resolving a key.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaBranch<'a> {
    /// A concrete schema node governs this path.
    Node {
        node: &'a SchemaNode,
        /// True when resolution passed through a wildcard branch. Below
        /// that point the schema is open-ended; consumers doing partial
        /// validation must not reject sibling fields they cannot see.
        under_wildcard: bool,
    },
    /// Resolution hit an "allow any value" wildcard; every value is valid
    /// at this path and below.
    AnyValue,
}

impl Resolution<'_> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Resolution::Branch(_))
    }
}

/// Resolves `key` against `schema`, segment by segment.
pub fn resolve<'a>(schema: &'a SchemaNode, key: &PathKey) -> Resolution<'a> {
    let mut node = schema;
    let mut under_wildcard = false;

    for segment in key.segments() {
        let SchemaNode::Object {
            properties,
            additional,
        } = node
        else {
            // Leaf reached with segments left over.
            return Resolution::Unsupported;
        };

        if let Some(child) = properties.get(segment) {
            node = child;
            continue;
        }

        match additional {
            Some(Wildcard::Allow(true)) => return Resolution::Branch(SchemaBranch::AnyValue),
            Some(Wildcard::Node(child)) => {
                node = child;
                under_wildcard = true;
            }
            Some(Wildcard::Allow(false)) | None => return Resolution::Unsupported,
        }
    }

    Resolution::Branch(SchemaBranch::Node {
        node,
        under_wildcard,
    })
}

/// Whether `key` names a location that exists in `schema`.
pub fn supported_key(schema: &SchemaNode, key: &PathKey) -> bool {
    resolve(schema, key).is_supported()
}
