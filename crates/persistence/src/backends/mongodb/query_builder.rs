//! MongoDB request builder.

use serde::Serialize;
use serde_json::{Value as Json, json};
use tracing::debug;

use tessera_model::{Condition, DeleteQuery, SelectQuery, Sort};

use super::config::MongoConfig;
use super::dialect::MongoDialect;
use crate::core::{BackendKind, QueryTranslator, Translator};
use crate::error::TranslationResult;

/// A `find` command ready to be sent.
///
/// `sort` is a list of single-key documents so that key order survives
/// serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MongoFind {
    pub collection: String,
    pub filter: Json,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Json>,
}

/// A `deleteMany` command ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MongoDelete {
    pub collection: String,
    pub filter: Json,
}

/// Builds MongoDB commands from model queries.
#[derive(Debug, Clone)]
pub struct MongoQueryBuilder {
    config: MongoConfig,
    translator: Translator<MongoDialect>,
}

impl MongoQueryBuilder {
    /// Creates a new query builder.
    pub fn new(config: MongoConfig) -> Self {
        Self {
            translator: Translator::new(MongoDialect::new(config.clone())),
            config,
        }
    }

    fn filter(&self, condition: Option<&Condition>) -> TranslationResult<Json> {
        match condition {
            Some(condition) => self.translator.translate(condition),
            None => Ok(json!({})),
        }
    }

    fn build_sort(&self, sorts: &[Sort]) -> Vec<Json> {
        sorts
            .iter()
            .map(|sort| {
                let direction = if sort.is_descending() { -1 } else { 1 };
                let mut entry = serde_json::Map::new();
                entry.insert(
                    self.config.document_field(&sort.field).to_string(),
                    json!(direction),
                );
                Json::Object(entry)
            })
            .collect()
    }

    fn build_projection(&self, fields: &[String]) -> Option<Json> {
        if fields.is_empty() {
            return None;
        }
        let projection: serde_json::Map<String, Json> = fields
            .iter()
            .map(|field| (self.config.document_field(field).to_string(), json!(1)))
            .collect();
        Some(Json::Object(projection))
    }
}

impl Default for MongoQueryBuilder {
    fn default() -> Self {
        Self::new(MongoConfig::default())
    }
}

impl QueryTranslator for MongoQueryBuilder {
    type Request = MongoFind;
    type DeleteRequest = MongoDelete;

    fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    fn select(&self, query: &SelectQuery) -> TranslationResult<MongoFind> {
        let find = MongoFind {
            collection: query.target().to_string(),
            filter: self.filter(query.condition())?,
            sort: self.build_sort(query.sorts()),
            skip: (query.skip() > 0).then(|| query.skip()),
            limit: query.limit(),
            projection: self.build_projection(query.projection()),
        };
        debug!(collection = %find.collection, filter = %find.filter, "Built MongoDB find");
        Ok(find)
    }

    fn delete(&self, query: &DeleteQuery) -> TranslationResult<MongoDelete> {
        let delete = MongoDelete {
            collection: query.target().to_string(),
            filter: self.filter(query.condition())?,
        };
        debug!(collection = %delete.collection, filter = %delete.filter, "Built MongoDB deleteMany");
        Ok(delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_model::Element;

    #[test]
    fn test_select_without_condition_matches_all() {
        let query = SelectQuery::new("person").unwrap();
        let find = MongoQueryBuilder::default().select(&query).unwrap();
        assert_eq!(find.filter, json!({}));
        assert_eq!(
            serde_json::to_value(&find).unwrap(),
            json!({"collection": "person", "filter": {}})
        );
    }

    #[test]
    fn test_select_sort_keeps_order() {
        let query = SelectQuery::new("person")
            .unwrap()
            .with_sort(Sort::parse("-age"))
            .with_sort(Sort::parse("id"));
        let find = MongoQueryBuilder::default().select(&query).unwrap();
        assert_eq!(find.sort, vec![json!({"age": -1}), json!({"_id": 1})]);
    }

    #[test]
    fn test_delete_filter() {
        let query = DeleteQuery::new("person")
            .unwrap()
            .with_condition(Condition::lt(Element::new("age", 18).unwrap()));
        let delete = MongoQueryBuilder::default().delete(&query).unwrap();
        assert_eq!(delete.filter, json!({"age": {"$lt": 18}}));
    }
}
