//! Memory backend settings.

use serde::{Deserialize, Serialize};

use crate::config::invalid_config;
use crate::core::BackendKind;
use crate::error::StorageResult;

/// Configuration for the in-memory backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Element identifying an entity for `update` (default: `"id"`).
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Add a random UUID id element to inserted entities that lack one
    /// (default: false).
    #[serde(default)]
    pub generate_ids: bool,
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            generate_ids: false,
        }
    }
}

impl MemoryConfig {
    /// Validates configuration invariants.
    pub fn validate(&self) -> StorageResult<()> {
        if self.id_field.trim().is_empty() {
            return Err(invalid_config(
                BackendKind::Memory,
                "id_field must not be empty",
            ));
        }
        Ok(())
    }
}
