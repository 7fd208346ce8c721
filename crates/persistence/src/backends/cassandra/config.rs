//! Cassandra translation settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the Cassandra dialect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CassandraConfig {
    /// Keyspace used to qualify table names. Unqualified when unset.
    #[serde(default)]
    pub keyspace: Option<String>,

    /// Append `ALLOW FILTERING` to selects with a condition (default: false).
    #[serde(default)]
    pub allow_filtering: bool,
}

impl CassandraConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if let Some(keyspace) = self.keyspace.as_deref() {
            let valid = !keyspace.is_empty()
                && keyspace.len() <= 48
                && keyspace
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(invalid_config(
                    BackendKind::Cassandra,
                    format!(
                        "keyspace '{}' must be 1-48 alphanumeric or underscore characters",
                        keyspace
                    ),
                ));
            }
        }
        Ok(())
    }
}
