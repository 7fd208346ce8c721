//! Elasticsearch dialect.
//!
//! Conditions render as Query DSL. Each entity name maps to its own index:
//! `{prefix}_{entity_name_lowercase}` (e.g., `tessera_person`).
//!
//! | Condition | Query DSL |
//! |-----------|-----------|
//! | `name = "Ada"` | `{"term": {"name.keyword": "Ada"}}` |
//! | `age > 18` | `{"range": {"age": {"gt": 18}}}` |
//! | `name LIKE "A%"` | `{"wildcard": {"name.keyword": {"value": "A*"}}}` |
//! | `tag IN [a, b]` | `{"terms": {"tag.keyword": ["a", "b"]}}` |
//! | `AND` | `{"bool": {"must": [...]}}` |
//! | `OR` | `{"bool": {"should": [...], "minimum_should_match": 1}}` |
//! | `NOT x` | `{"bool": {"must_not": [x]}}` |

mod config;
mod dialect;
mod query_builder;
mod reader;

pub use config::ElasticsearchConfig;
pub use dialect::EsDialect;
pub use query_builder::{EsDeleteByQuery, EsQuery, EsQueryBuilder};
pub use reader::{entities_from_response, entity_from_hit};
