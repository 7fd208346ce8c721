//! Elasticsearch search request builder.

use serde::Serialize;
use serde_json::{Value as Json, json};
use tracing::debug;

use tessera_model::{Condition, DeleteQuery, SelectQuery, Sort, SortDirection};

use super::config::ElasticsearchConfig;
use super::dialect::EsDialect;
use crate::core::{BackendKind, QueryTranslator, Translator};
use crate::error::{TranslationError, TranslationResult};

/// A complete Elasticsearch query body ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsQuery {
    /// The index to search.
    pub index: String,
    /// The complete query body.
    pub body: Json,
}

/// A `_delete_by_query` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsDeleteByQuery {
    /// The index to delete from.
    pub index: String,
    /// The request body, holding only `query`.
    pub body: Json,
}

/// Builds Elasticsearch requests from model queries.
#[derive(Debug, Clone)]
pub struct EsQueryBuilder {
    config: ElasticsearchConfig,
    translator: Translator<EsDialect>,
}

impl Default for EsQueryBuilder {
    fn default() -> Self {
        Self::new(ElasticsearchConfig::default())
    }
}

impl EsQueryBuilder {
    /// Creates a new query builder.
    pub fn new(config: ElasticsearchConfig) -> Self {
        Self {
            translator: Translator::new(EsDialect::new(config.clone())),
            config,
        }
    }

    fn build_query(&self, condition: Option<&Condition>) -> TranslationResult<Json> {
        match condition {
            Some(condition) => self.translator.translate(condition),
            None => Ok(json!({ "match_all": {} })),
        }
    }

    /// Builds the sort clause.
    fn build_sort(&self, sorts: &[Sort]) -> Json {
        let clauses: Vec<Json> = sorts
            .iter()
            .map(|sort| {
                let order = match sort.direction {
                    SortDirection::Ascending => "asc",
                    SortDirection::Descending => "desc",
                };
                let mut clause = serde_json::Map::new();
                clause.insert(self.config.sort_field(&sort.field), json!({ "order": order }));
                Json::Object(clause)
            })
            .collect();
        json!(clauses)
    }
}

impl QueryTranslator for EsQueryBuilder {
    type Request = EsQuery;
    type DeleteRequest = EsDeleteByQuery;

    fn kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
    }

    fn select(&self, query: &SelectQuery) -> TranslationResult<EsQuery> {
        let mut body = json!({
            "query": self.build_query(query.condition())?,
        });

        // Add sorting
        if !query.sorts().is_empty() {
            body["sort"] = self.build_sort(query.sorts());
        }

        // Add pagination
        let size = query.limit().unwrap_or(self.config.default_size);
        if query.skip().saturating_add(size) > self.config.max_result_window {
            return Err(TranslationError::feature(
                BackendKind::Elasticsearch,
                format!(
                    "pages beyond the result window ({})",
                    self.config.max_result_window
                ),
            ));
        }
        body["size"] = json!(size);
        if query.skip() > 0 {
            body["from"] = json!(query.skip());
        }

        if !query.projection().is_empty() {
            body["_source"] = json!(query.projection());
        }

        // Track total hits
        body["track_total_hits"] = json!(self.config.track_total_hits);

        let index = self.config.index_name(query.target());
        debug!(index = %index, body = %body, "Built Elasticsearch search");
        Ok(EsQuery { index, body })
    }

    fn delete(&self, query: &DeleteQuery) -> TranslationResult<EsDeleteByQuery> {
        let body = json!({ "query": self.build_query(query.condition())? });
        let index = self.config.index_name(query.target());
        debug!(index = %index, body = %body, "Built Elasticsearch delete_by_query");
        Ok(EsDeleteByQuery { index, body })
    }
}
