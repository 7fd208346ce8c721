//! Couchbase dialect.
//!
//! Conditions render as N1QL predicates with numbered `$n` parameters over
//! the collection named after the entity. The id element is read from and
//! matched against the document key, `META(d).id`.

mod config;
mod dialect;
mod query_builder;

pub use config::CouchbaseConfig;
pub use dialect::{N1qlDialect, N1qlFragment, quote_identifier};
pub use query_builder::{N1qlQueryBuilder, N1qlStatement};
