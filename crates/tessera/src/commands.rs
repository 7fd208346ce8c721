//! Subcommand implementations.
//!
//! Each command returns the JSON it prints, so the rendering can be tested
//! without capturing stdout.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde_json::{Value as Json, json};
use tracing::{debug, info};

use tessera_model::Entity;
use tessera_persistence::backends::explain;
use tessera_persistence::backends::memory::MemoryBackend;
use tessera_persistence::core::{BackendCapability, EntityManager};
use tessera_persistence::{BackendKind, PersistenceConfig, QueryDocument};

/// Reads a query document.
pub fn read_query(path: &Path) -> anyhow::Result<QueryDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read query {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid query document {}", path.display()))
}

/// Renders the native request for one backend.
pub fn explain_query(
    backend: BackendKind,
    config: &PersistenceConfig,
    document: &QueryDocument,
) -> anyhow::Result<Json> {
    let request = explain(backend, config, document)?;
    info!(backend = %backend, target = %document.target(), "Rendered query");
    Ok(request)
}

/// Reads entities grouped by name: `{"person": [{"name": "Ada"}, ...]}`.
pub fn read_entities(path: &Path) -> anyhow::Result<Vec<Entity>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read data {}", path.display()))?;
    let Json::Object(groups) = serde_json::from_str::<Json>(&text)? else {
        bail!("{}: expected an object of entity arrays", path.display());
    };

    let mut entities = Vec::new();
    for (name, records) in groups {
        let Json::Array(records) = records else {
            bail!("{}: '{}' must be an array", path.display(), name);
        };
        for record in records {
            entities.push(Entity::from_json(name.clone(), record)?);
        }
    }
    debug!(count = entities.len(), "Loaded entities");
    Ok(entities)
}

/// Executes a query against the given entities in the memory backend.
///
/// Selects print the matching entities; deletes print the removed count and
/// the entities that remain.
pub async fn run_query(
    config: &PersistenceConfig,
    entities: Vec<Entity>,
    document: &QueryDocument,
) -> anyhow::Result<Json> {
    let backend = MemoryBackend::new(config.memory.clone())?;
    backend.insert_all(entities).await?;

    let output = match document {
        QueryDocument::Select(query) => {
            let found = backend.select(query).await?;
            Json::Array(found.iter().map(Entity::to_json).collect())
        }
        QueryDocument::Delete(query) => {
            let removed = backend.delete(query).await?;
            let remaining = backend.count(query.target()).await?;
            json!({ "removed": removed, "remaining": remaining })
        }
    };
    Ok(output)
}

/// Describes every built-in backend.
pub fn list_backends() -> Json {
    let backends: Vec<Json> = BackendKind::BUILTIN
        .iter()
        .map(|kind| {
            let capabilities: Vec<String> = kind
                .capabilities()
                .iter()
                .map(|capability| format!("{:?}", capability))
                .collect();
            json!({
                "name": kind.to_string(),
                "family": kind.family().to_string(),
                "native_negation": kind.supports(BackendCapability::NativeNegation),
                "capabilities": capabilities,
            })
        })
        .collect();
    Json::Array(backends)
}
