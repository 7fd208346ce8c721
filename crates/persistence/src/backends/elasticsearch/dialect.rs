//! Elasticsearch Query DSL clauses.

use serde_json::{Value as Json, json};

use tessera_model::{Scalar, Value, convert};

use super::config::ElasticsearchConfig;
use crate::core::pattern::escape_chars;
use crate::core::{BackendKind, CompareOp, Dialect, LikePattern, NegationStrategy, PatternShape};
use crate::error::{TranslationError, TranslationResult};

/// Renders conditions as Query DSL clauses.
///
/// Exact matches on text go to the keyword sub-field so that analyzed text
/// fields still compare whole values.
#[derive(Debug, Clone, Default)]
pub struct EsDialect {
    config: ElasticsearchConfig,
}

impl EsDialect {
    pub fn new(config: ElasticsearchConfig) -> Self {
        Self { config }
    }

    fn is_id(&self, field: &str) -> bool {
        field == self.config.id_field
    }

    /// The field to use for exact matching against `values`.
    fn exact_field(&self, field: &str, values: &[&Value]) -> String {
        if self.is_id(field) {
            return "_id".to_string();
        }
        let all_text = !values.is_empty()
            && values
                .iter()
                .all(|v| matches!(v, Value::Scalar(Scalar::Text(_))));
        if all_text {
            format!("{}{}", field, self.config.keyword_suffix)
        } else {
            field.to_string()
        }
    }

    fn range(&self, field: &str, bounds: Json, operands: &[&Value]) -> TranslationResult<Json> {
        let target = self.exact_field(field, operands);
        if target == "_id" {
            return Err(TranslationError::feature(
                BackendKind::Elasticsearch,
                "range queries on _id",
            ));
        }
        let mut clause = serde_json::Map::new();
        clause.insert(target, bounds);
        Ok(json!({ "range": clause }))
    }
}

fn single(key: String, value: Json) -> Json {
    let mut object = serde_json::Map::new();
    object.insert(key, value);
    Json::Object(object)
}

/// Escapes a literal for wildcard syntax.
fn escape_wildcard(s: &str) -> String {
    escape_chars(s, &['\\', '*', '?'])
}

impl Dialect for EsDialect {
    type Filter = Json;

    fn kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
    }

    fn compare(&self, field: &str, op: CompareOp, value: &Value) -> TranslationResult<Json> {
        let key = match op {
            CompareOp::Eq => {
                let target = self.exact_field(field, &[value]);
                return Ok(json!({ "term": single(target, convert(value)) }));
            }
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        };
        self.range(field, single(key.to_string(), convert(value)), &[value])
    }

    fn like(&self, field: &str, pattern: &LikePattern) -> TranslationResult<Json> {
        let text = Value::from(pattern.source());
        let target = self.exact_field(field, &[&text]);
        match pattern.shape() {
            PatternShape::Exact(literal) if self.config.case_insensitive_like => Ok(json!({
                "term": single(target, json!({ "value": literal, "case_insensitive": true }))
            })),
            PatternShape::Exact(literal) => Ok(json!({ "term": single(target, json!(literal)) })),
            PatternShape::Any => Ok(json!({ "exists": { "field": field } })),
            _ => {
                let mut wildcard = json!({ "value": pattern.to_wildcard(escape_wildcard) });
                if self.config.case_insensitive_like {
                    wildcard["case_insensitive"] = json!(true);
                }
                Ok(json!({ "wildcard": single(target, wildcard) }))
            }
        }
    }

    fn in_list(&self, field: &str, values: &[Value]) -> TranslationResult<Json> {
        let refs: Vec<&Value> = values.iter().collect();
        let target = self.exact_field(field, &refs);
        let values: Vec<Json> = values.iter().map(convert).collect();
        Ok(json!({ "terms": single(target, json!(values)) }))
    }

    fn between(&self, field: &str, low: &Value, high: &Value) -> TranslationResult<Json> {
        self.range(
            field,
            json!({ "gte": convert(low), "lte": convert(high) }),
            &[low, high],
        )
    }

    fn and(&self, filters: Vec<Json>) -> TranslationResult<Json> {
        Ok(json!({ "bool": { "must": filters } }))
    }

    fn or(&self, filters: Vec<Json>) -> TranslationResult<Json> {
        Ok(json!({
            "bool": {
                "should": filters,
                "minimum_should_match": 1
            }
        }))
    }

    fn negation(&self) -> NegationStrategy {
        NegationStrategy::Native
    }

    fn not(&self, filter: Json) -> TranslationResult<Json> {
        Ok(json!({ "bool": { "must_not": [filter] } }))
    }
}
