//! MongoDB filter documents.

use serde_json::{Value as Json, json};

use tessera_model::Value;

use super::config::MongoConfig;
use super::extjson;
use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy};
use crate::error::TranslationResult;

/// Renders conditions as MongoDB query filter documents.
///
/// | Condition | Filter |
/// |-----------|--------|
/// | `age > 18` | `{"age": {"$gt": 18}}` |
/// | `name LIKE "A%"` | `{"name": {"$regex": "^A(?s:.*)$"}}` |
/// | `tag IN [a, b]` | `{"tag": {"$in": ["a", "b"]}}` |
/// | `age BETWEEN 18 AND 65` | `{"age": {"$gte": 18, "$lte": 65}}` |
/// | `AND` / `OR` | `{"$and": [...]}` / `{"$or": [...]}` |
/// | `NOT x` | `{"$nor": [x]}` |
#[derive(Debug, Clone, Default)]
pub struct MongoDialect {
    config: MongoConfig,
}

impl MongoDialect {
    pub fn new(config: MongoConfig) -> Self {
        Self { config }
    }

    fn field_filter(&self, field: &str, operators: Json) -> Json {
        let mut filter = serde_json::Map::new();
        filter.insert(self.config.document_field(field).to_string(), operators);
        Json::Object(filter)
    }
}

fn operator(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "$eq",
        CompareOp::Gt => "$gt",
        CompareOp::Gte => "$gte",
        CompareOp::Lt => "$lt",
        CompareOp::Lte => "$lte",
    }
}

impl Dialect for MongoDialect {
    type Filter = Json;

    fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<Json> {
        let mut operators = serde_json::Map::new();
        operators.insert(operator(op).to_string(), extjson::encode(value));
        Ok(self.field_filter(field, Json::Object(operators)))
    }

    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<Json> {
        let operators = if self.config.case_insensitive_like {
            json!({ "$regex": pattern.to_regex(), "$options": "i" })
        } else {
            json!({ "$regex": pattern.to_regex() })
        };
        Ok(self.field_filter(field, operators))
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<Json> {
        let values: Vec<Json> = values.iter().map(extjson::encode).collect();
        Ok(self.field_filter(field, json!({ "$in": values })))
    }

    fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<Json> {
        Ok(self.field_filter(
            field,
            json!({ "$gte": extjson::encode(low), "$lte": extjson::encode(high) }),
        ))
    }

    fn and(&self, filters: Vec<Json>) -> TranslationResult<Json> {
        Ok(json!({ "$and": filters }))
    }

    fn or(&self, filters: Vec<Json>) -> TranslationResult<Json> {
        Ok(json!({ "$or": filters }))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Native
    }

    // `$not` only applies to operator expressions; `$nor` negates whole filters.
    fn not(&self, filter: Json) -> TranslationResult<Json> {
        Ok(json!({ "$nor": [filter] }))
    }
}
