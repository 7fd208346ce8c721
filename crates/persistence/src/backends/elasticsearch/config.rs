//! Elasticsearch translation settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the Elasticsearch dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Index name prefix (default: `"tessera"`).
    /// Indices are named: `{prefix}_{entity_name_lowercase}`, or just the
    /// lowercased entity name when the prefix is empty.
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Page size used when a query has no limit (default: 20).
    #[serde(default = "default_size")]
    pub default_size: u64,

    /// Maximum result window size (default: 10000).
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u64,

    /// Sub-field holding the untokenized copy of text fields
    /// (default: `".keyword"`). Empty to query text fields directly.
    #[serde(default = "default_keyword_suffix")]
    pub keyword_suffix: String,

    /// Entity element mapped onto the document `_id` (default: `"id"`).
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Whether to request exact hit counts (default: true).
    #[serde(default = "default_track_total_hits")]
    pub track_total_hits: bool,

    /// Render LIKE as a case-insensitive term or wildcard query (default: false).
    #[serde(default)]
    pub case_insensitive_like: bool,

    /// Text fields sorted through their keyword sub-field. Analyzed text
    /// cannot be sorted directly.
    #[serde(default)]
    pub keyword_sort_fields: Vec<String>,
}

fn default_index_prefix() -> String {
    "tessera".to_string()
}

fn default_size() -> u64 {
    20
}

fn default_max_result_window() -> u64 {
    10_000
}

fn default_keyword_suffix() -> String {
    ".keyword".to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_track_total_hits() -> bool {
    true
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            index_prefix: default_index_prefix(),
            default_size: default_size(),
            max_result_window: default_max_result_window(),
            keyword_suffix: default_keyword_suffix(),
            id_field: default_id_field(),
            track_total_hits: default_track_total_hits(),
            case_insensitive_like: false,
            keyword_sort_fields: Vec::new(),
        }
    }
}

const INVALID_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

impl ElasticsearchConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if self.default_size == 0 {
            return Err(invalid_config(
                BackendKind::Elasticsearch,
                "default_size must be > 0",
            ));
        }

        if self.default_size > self.max_result_window {
            return Err(invalid_config(
                BackendKind::Elasticsearch,
                "default_size must not exceed max_result_window",
            ));
        }

        if self.index_prefix.chars().any(|c| INVALID_INDEX_CHARS.contains(&c))
            || self.index_prefix != self.index_prefix.to_lowercase()
        {
            return Err(invalid_config(
                BackendKind::Elasticsearch,
                format!("'{}' is not a valid index prefix", self.index_prefix),
            ));
        }

        if self.id_field.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::Elasticsearch,
                "id_field must not be empty",
            ));
        }

        Ok(())
    }

    /// Returns the index holding entities named `entity_name`.
    pub fn index_name(&self, entity_name: &str) -> String {
        if self.index_prefix.is_empty() {
            entity_name.to_lowercase()
        } else {
            format!("{}_{}", self.index_prefix, entity_name.to_lowercase())
        }
    }

    /// Maps an entity element onto the field its sort clause targets.
    pub fn sort_field(&self, field: &str) -> String {
        if field == self.id_field {
            "_id".to_string()
        } else if self.keyword_sort_fields.iter().any(|f| f == field) {
            format!("{}{}", field, self.keyword_suffix)
        } else {
            field.to_string()
        }
    }
}
