//! Backend dialects.
//!
//! Each backend is gated behind a feature flag and provides a
//! [`Dialect`](crate::core::Dialect), a [`QueryTranslator`] rendering whole
//! queries, and its configuration section.
//!
//! # Available Backends
//!
//! | Backend | Feature | Native request |
//! |---------|---------|----------------|
//! | MongoDB | `mongodb` | `find` / `deleteMany` filter documents |
//! | Couchbase | `couchbase` | N1QL statements with `$n` parameters |
//! | Cassandra | `cassandra` | CQL statements with `?` parameters |
//! | Elasticsearch | `elasticsearch` | Query DSL search / `_delete_by_query` bodies |
//! | Solr | `solr` | `/select` parameters / JSON delete commands |
//! | Key-value | `keyvalue` | Multi-get / multi-remove key lists |
//! | Memory | `memory` | Executes queries in process |
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "solr")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tessera_model::{Condition, Element, SelectQuery};
//! use tessera_persistence::backends::explain;
//! use tessera_persistence::config::PersistenceConfig;
//! use tessera_persistence::core::{BackendKind, QueryDocument};
//!
//! let query = SelectQuery::new("person")?
//!     .with_condition(Condition::lt(Element::new("age", 18)?));
//! let request = explain(
//!     BackendKind::Solr,
//!     &PersistenceConfig::default(),
//!     &QueryDocument::from(query),
//! )?;
//! assert_eq!(request["q"], "age:[* TO 18}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "solr"))]
//! # fn main() {}
//! ```

use serde_json::{Value as Json, json};
use tracing::debug;

use crate::config::PersistenceConfig;
use crate::core::{BackendKind, QueryDocument, QueryTranslator};
use crate::error::{StorageResult, TranslationError};

#[cfg(feature = "cassandra")]
pub mod cassandra;
#[cfg(feature = "couchbase")]
pub mod couchbase;
#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
#[cfg(feature = "keyvalue")]
pub mod keyvalue;
#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongodb;
#[cfg(feature = "solr")]
pub mod solr;

/// Renders a query document into the native request of one backend,
/// without executing it.
///
/// The memory backend has no native request; its explanation is the
/// compiled condition in readable form.
///
/// # Errors
///
/// * `StorageError::Translation` - If the backend cannot express the query,
///   or was not compiled in
/// * `StorageError::Backend(SerializationError)` - If the request cannot be
///   serialized
pub fn explain(
    kind: BackendKind,
    config: &PersistenceConfig,
    document: &QueryDocument,
) -> StorageResult<Json> {
    debug!(backend = %kind, target = %document.target(), "Explaining query");

    match kind {
        #[cfg(feature = "mongodb")]
        BackendKind::MongoDB => render(
            &mongodb::MongoQueryBuilder::new(config.mongodb.clone()),
            document,
        ),
        #[cfg(feature = "couchbase")]
        BackendKind::Couchbase => render(
            &couchbase::N1qlQueryBuilder::new(config.couchbase.clone()),
            document,
        ),
        #[cfg(feature = "cassandra")]
        BackendKind::Cassandra => render(
            &cassandra::CqlQueryBuilder::new(config.cassandra.clone()),
            document,
        ),
        #[cfg(feature = "elasticsearch")]
        BackendKind::Elasticsearch => render(
            &elasticsearch::EsQueryBuilder::new(config.elasticsearch.clone()),
            document,
        ),
        #[cfg(feature = "solr")]
        BackendKind::Solr => render(
            &solr::SolrQueryBuilder::new(config.solr.clone()),
            document,
        ),
        #[cfg(feature = "keyvalue")]
        BackendKind::KeyValue => render(
            &keyvalue::KeyValueQueryBuilder::new(config.keyvalue.clone()),
            document,
        ),
        #[cfg(feature = "memory")]
        BackendKind::Memory => explain_memory(document),
        other => Err(TranslationError::feature(other, "explain (backend not compiled in)").into()),
    }
}

fn render<T: QueryTranslator>(translator: &T, document: &QueryDocument) -> StorageResult<Json> {
    let request = match document {
        QueryDocument::Select(query) => serde_json::to_value(translator.select(query)?)?,
        QueryDocument::Delete(query) => serde_json::to_value(translator.delete(query)?)?,
    };
    Ok(request)
}

#[cfg(feature = "memory")]
fn explain_memory(document: &QueryDocument) -> StorageResult<Json> {
    use crate::core::Translator;

    let (operation, condition) = match document {
        QueryDocument::Select(query) => ("select", query.condition()),
        QueryDocument::Delete(query) => ("delete", query.condition()),
    };
    if let Some(condition) = condition {
        // Surfaces pattern errors the same way execution would.
        Translator::new(memory::MemoryDialect).translate(condition)?;
    }
    Ok(json!({
        "operation": operation,
        "target": document.target(),
        "predicate": condition.map(|c| c.to_string()),
    }))
}
