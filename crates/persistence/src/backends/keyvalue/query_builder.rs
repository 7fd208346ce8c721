//! Key-value request builder.

use serde::Serialize;
use tracing::debug;

use tessera_model::{Condition, DeleteQuery, SelectQuery};

use super::config::KeyValueConfig;
use super::dialect::KeyValueDialect;
use crate::core::{BackendKind, QueryTranslator, Translator};
use crate::error::{TranslationError, TranslationResult};

/// A multi-get or multi-remove of explicit keys in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValueRequest {
    pub bucket: String,
    pub keys: Vec<String>,
}

/// Builds key lookups from model queries.
#[derive(Debug, Clone, Default)]
pub struct KeyValueQueryBuilder {
    translator: Translator<KeyValueDialect>,
}

impl KeyValueQueryBuilder {
    /// Creates a new query builder.
    pub fn new(config: KeyValueConfig) -> Self {
        Self {
            translator: Translator::new(KeyValueDialect::new(config)),
        }
    }

    fn request(&self, bucket: &str, condition: Option<&Condition>) -> TranslationResult<KeyValueRequest> {
        let condition = condition
            .ok_or_else(|| TranslationError::feature(BackendKind::KeyValue, "full scans"))?;
        let keys = self.translator.translate(condition)?.keys;
        Ok(KeyValueRequest {
            bucket: bucket.to_string(),
            keys,
        })
    }
}

impl QueryTranslator for KeyValueQueryBuilder {
    type Request = KeyValueRequest;
    type DeleteRequest = KeyValueRequest;

    fn kind(&self) -> BackendKind {
        BackendKind::KeyValue
    }

    fn select(&self, query: &SelectQuery) -> TranslationResult<KeyValueRequest> {
        let unsupported = [
            (!query.sorts().is_empty(), "sorting"),
            (query.skip() > 0, "skip"),
            (query.limit().is_some(), "limit"),
            (!query.projection().is_empty(), "projection"),
        ];
        if let Some((_, feature)) = unsupported.iter().find(|(present, _)| *present) {
            return Err(TranslationError::feature(BackendKind::KeyValue, *feature));
        }

        let request = self.request(query.target(), query.condition())?;
        debug!(bucket = %request.bucket, keys = request.keys.len(), "Built key-value get");
        Ok(request)
    }

    fn delete(&self, query: &DeleteQuery) -> TranslationResult<KeyValueRequest> {
        let request = self.request(query.target(), query.condition())?;
        debug!(bucket = %request.bucket, keys = request.keys.len(), "Built key-value remove");
        Ok(request)
    }
}
