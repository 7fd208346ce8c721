//! Couchbase translation settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the Couchbase dialect.
///
/// Each entity name maps to a collection: `` `bucket`.`scope`.`entity` ``.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouchbaseConfig {
    /// Bucket name (default: `"default"`).
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Scope name (default: `"_default"`).
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Entity element stored as the document key (default: `"id"`).
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_bucket() -> String {
    "default".to_string()
}

fn default_scope() -> String {
    "_default".to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Default for CouchbaseConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            scope: default_scope(),
            id_field: default_id_field(),
        }
    }
}

impl CouchbaseConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::Couchbase,
                "bucket must not be empty",
            ));
        }
        if self.scope.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::Couchbase,
                "scope must not be empty",
            ));
        }
        if self.id_field.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::Couchbase,
                "id_field must not be empty",
            ));
        }
        Ok(())
    }
}
