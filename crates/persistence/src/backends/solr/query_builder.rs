//! Solr request builder.

use serde::Serialize;
use tracing::debug;

use tessera_model::{DeleteQuery, SelectQuery, Value};

use super::config::SolrConfig;
use super::dialect::{SolrDialect, escape_term};
use crate::core::{BackendKind, CompareOp, Dialect, QueryTranslator, Translator};
use crate::error::TranslationResult;

/// Parameters for the `/select` handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrSelect {
    pub q: String,
    pub fq: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    pub rows: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fl: Option<String>,
}

/// A JSON update command: `{"delete": {"query": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrDelete {
    pub delete: SolrDeleteByQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrDeleteByQuery {
    pub query: String,
}

/// Builds Solr requests from model queries.
#[derive(Debug, Clone, Default)]
pub struct SolrQueryBuilder {
    config: SolrConfig,
    translator: Translator<SolrDialect>,
}

impl SolrQueryBuilder {
    /// Creates a new query builder.
    pub fn new(config: SolrConfig) -> Self {
        Self {
            config,
            translator: Translator::new(SolrDialect),
        }
    }

    /// The filter restricting results to one entity name.
    fn entity_filter(&self, entity_name: &str) -> TranslationResult<String> {
        self.translator.dialect().compare(
            &self.config.entity_field,
            CompareOp::Eq,
            &Value::from(entity_name),
        )
    }
}

impl QueryTranslator for SolrQueryBuilder {
    type Request = SolrSelect;
    type DeleteRequest = SolrDelete;

    fn kind(&self) -> BackendKind {
        BackendKind::Solr
    }

    fn select(&self, query: &SelectQuery) -> TranslationResult<SolrSelect> {
        let q = match query.condition() {
            Some(condition) => self.translator.translate(condition)?,
            None => "*:*".to_string(),
        };

        let sort = (!query.sorts().is_empty()).then(|| {
            query
                .sorts()
                .iter()
                .map(|sort| {
                    let direction = if sort.is_descending() { "desc" } else { "asc" };
                    format!("{} {}", escape_term(&sort.field), direction)
                })
                .collect::<Vec<_>>()
                .join(",")
        });

        let fl = (!query.projection().is_empty()).then(|| query.projection().join(","));

        let select = SolrSelect {
            q,
            fq: vec![self.entity_filter(query.target())?],
            sort,
            start: (query.skip() > 0).then(|| query.skip()),
            rows: query.limit().unwrap_or(self.config.default_rows),
            fl,
        };
        debug!(q = %select.q, rows = select.rows, "Built Solr select");
        Ok(select)
    }

    fn delete(&self, query: &DeleteQuery) -> TranslationResult<SolrDelete> {
        let entity = self.entity_filter(query.target())?;
        let query = match query.condition() {
            Some(condition) => format!("({} AND {})", entity, self.translator.translate(condition)?),
            None => entity,
        };
        debug!(query = %query, "Built Solr delete");
        Ok(SolrDelete {
            delete: SolrDeleteByQuery { query },
        })
    }
}
