//! MongoDB translation settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the MongoDB dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Entity element stored as the document `_id` (default: `"id"`).
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Render LIKE as a case-insensitive regular expression (default: false).
    #[serde(default)]
    pub case_insensitive_like: bool,
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            case_insensitive_like: false,
        }
    }
}

impl MongoConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if self.id_field.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::MongoDB,
                "id_field must not be empty",
            ));
        }
        if self.id_field.starts_with('$') {
            return Err(invalid_config(
                BackendKind::MongoDB,
                "id_field must not start with '$'",
            ));
        }
        Ok(())
    }

    /// Maps an entity element name onto its document field.
    pub fn document_field<'a>(&self, field: &'a str) -> &'a str {
        if field == self.id_field { "_id" } else { field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_default() {
        assert!(MongoConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_operator_id_field() {
        let config = MongoConfig {
            id_field: "$id".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_document_field_maps_id() {
        let config = MongoConfig::default();
        assert_eq!(config.document_field("id"), "_id");
        assert_eq!(config.document_field("name"), "name");
    }
}
