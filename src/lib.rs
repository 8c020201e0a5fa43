//! gatedb - a schema-guarded, typed access layer over simple persistent
//! stores
//!
//! Keys normalize in [`key`], schemas resolve and validate in [`schema`],
//! values sanitize in [`value`], backends implement [`store::Store`], and
//! the per-shape wrappers live in [`typed`].

pub mod key;
pub mod schema;
pub mod store;
pub mod typed;
pub mod value;
