//! Key-value translation settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the key-value dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueConfig {
    /// The only element a query may restrict (default: `"id"`).
    #[serde(default = "default_key_field")]
    pub key_field: String,
}

fn default_key_field() -> String {
    "id".to_string()
}

impl Default for KeyValueConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
        }
    }
}

impl KeyValueConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if self.key_field.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::KeyValue,
                "key_field must not be empty",
            ));
        }
        Ok(())
    }
}
