//! MongoDB dialect.
//!
//! Conditions render as query filter documents in relaxed Extended JSON, so
//! the output can be passed to any driver's `find` / `deleteMany` as is.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tessera_model::{Condition, Element, SelectQuery};
//! use tessera_persistence::backends::mongodb::MongoQueryBuilder;
//! use tessera_persistence::core::QueryTranslator;
//!
//! let query = SelectQuery::new("person")?
//!     .with_condition(Condition::gte(Element::new("age", 18)?));
//! let find = MongoQueryBuilder::default().select(&query)?;
//! assert_eq!(find.filter, json!({"age": {"$gte": 18}}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod dialect;
pub mod extjson;
mod query_builder;
mod reader;

pub use config::MongoConfig;
pub use dialect::MongoDialect;
pub use query_builder::{MongoDelete, MongoFind, MongoQueryBuilder};
pub use reader::{document_from_entity, entity_from_document};
