//! Key-value dialect.
//!
//! A key-value store can only fetch or remove explicit keys, so queries
//! must reduce to a set of keys on the configured key element. Anything
//! else, including a query with no condition, is rejected.

mod config;
mod dialect;
mod query_builder;

pub use config::KeyValueConfig;
pub use dialect::{KeySet, KeyValueDialect};
pub use query_builder::{KeyValueQueryBuilder, KeyValueRequest};
