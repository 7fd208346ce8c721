//! Cassandra dialect.
//!
//! Conditions render as CQL restrictions with positional `?` parameters.
//! CQL's query model is narrower than the condition algebra:
//!
//! - `OR` is rejected
//! - `NOT` is rewritten into complementary ranges; `NOT (a = b)`, negated
//!   `LIKE`/`IN` and negated conjunctions are rejected
//! - `LIKE` is limited to prefix, suffix and contains patterns
//! - `skip` is rejected; there is no offset in CQL
//! - a delete without a condition truncates the table

mod config;
mod dialect;
mod query_builder;
mod reader;

pub use config::CassandraConfig;
pub use dialect::{CqlDialect, CqlFragment, quote_identifier};
pub use query_builder::{CqlQueryBuilder, CqlStatement};
pub use reader::{entity_from_row, insert_columns};
