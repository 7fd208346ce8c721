//! Solr dialect.
//!
//! Conditions render as standard query parser strings. Entities share one
//! core and are told apart by a discriminator field, applied as a filter
//! query so it does not affect scoring.

mod config;
mod dialect;
mod query_builder;
mod reader;

pub use config::SolrConfig;
pub use dialect::{SolrDialect, escape_term};
pub use query_builder::{SolrDelete, SolrDeleteByQuery, SolrQueryBuilder, SolrSelect};
pub use reader::{document_from_entity, entity_from_document};
