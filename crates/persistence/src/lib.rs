//! Tessera persistence layer
//!
//! This crate translates the database-agnostic queries of [`tessera_model`]
//! into the native requests of several NoSQL backends, and executes them
//! in process for the reference memory backend.
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tessera-persistence = { version = "0.1", default-features = false, features = ["mongodb"] }
//! ```
//!
//! Available backend features (all enabled by default):
//! - `mongodb` - MongoDB filter documents
//! - `couchbase` - N1QL statements
//! - `cassandra` - CQL statements
//! - `elasticsearch` - Elasticsearch Query DSL
//! - `solr` - Solr standard query parser syntax
//! - `keyvalue` - Key lookups for key-value stores
//! - `memory` - In-process reference backend
//!
//! # Architecture
//!
//! - [`core`] - Dialects, the generic translator and the entity manager trait
//! - [`backends`] - One module per backend: config, dialect, query builder
//! - [`config`] - Combined configuration for all compiled-in backends
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! # #[cfg(feature = "mongodb")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use serde_json::json;
//! use tessera_model::{Condition, Element, SelectQuery};
//! use tessera_persistence::backends::mongodb::MongoQueryBuilder;
//! use tessera_persistence::core::QueryTranslator;
//!
//! let query = SelectQuery::new("person")?.with_condition(Condition::or([
//!     Condition::eq(Element::new("name", "Ada")?),
//!     Condition::gt(Element::new("age", 65)?),
//! ])?);
//!
//! let find = MongoQueryBuilder::default().select(&query)?;
//! assert_eq!(
//!     find.filter,
//!     json!({"$or": [{"name": {"$eq": "Ada"}}, {"age": {"$gt": 65}}]})
//! );
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "mongodb"))]
//! # fn main() {}
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod core;
pub mod error;

pub use config::PersistenceConfig;
pub use core::{BackendKind, Dialect, EntityManager, QueryDocument, QueryTranslator, Translator};
pub use error::{BackendError, StorageError, StorageResult, TranslationError, TranslationResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
