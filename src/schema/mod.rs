//! Schema definition, resolution, compilation and caching.
//!
//! The schema subsystem is pure and synchronous: it never performs I/O.
//! `types` holds the schema data model, `tree` resolves a [`crate::key::PathKey`]
//! to the sub-schema governing that path, `validator` compiles a branch
//! into a reusable predicate, and `cache` memoizes one validator per
//! distinct path.

pub mod cache;
pub mod errors;
pub mod tree;
pub mod types;
pub mod validator;

pub use cache::ValidatorCache;
pub use errors::{SchemaError, SchemaResult};
pub use tree::{resolve, supported_key, Resolution, SchemaBranch};
pub use types::{SchemaNode, Wildcard};
pub use validator::{format_violations, json_type_name, CompiledValidator, Violation};
