//! Solr translation settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the Solr dialect.
///
/// All entities share one core; each document carries its entity name in
/// `entity_field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolrConfig {
    /// Field holding the entity name (default: `"_entity"`).
    #[serde(default = "default_entity_field")]
    pub entity_field: String,

    /// Rows returned when a query has no limit (default: 10).
    #[serde(default = "default_rows")]
    pub default_rows: u64,
}

fn default_entity_field() -> String {
    "_entity".to_string()
}

fn default_rows() -> u64 {
    10
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            entity_field: default_entity_field(),
            default_rows: default_rows(),
        }
    }
}

impl SolrConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if self.entity_field.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::Solr,
                "entity_field must not be empty",
            ));
        }
        if self.default_rows == 0 {
            return Err(invalid_config(BackendKind::Solr, "default_rows must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_default() {
        assert!(SolrConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_rows() {
        let config = SolrConfig {
            default_rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
