//! Reading search hits back into entities.

use serde_json::Value as Json;

use tessera_model::{Element, Entity, ModelError, ModelResult};

use super::config::ElasticsearchConfig;

/// Reads one entry of `hits.hits` into an entity named `name`.
///
/// Fields come from `_source`; `_id` fills the id element when the source
/// does not carry one.
pub fn entity_from_hit(name: &str, hit: &Json, config: &ElasticsearchConfig) -> ModelResult<Entity> {
    let source = hit
        .get("_source")
        .cloned()
        .unwrap_or_else(|| Json::Object(serde_json::Map::new()));
    let mut entity = Entity::from_json(name, source)?;

    if !entity.contains(&config.id_field) {
        if let Some(id) = hit.get("_id").and_then(Json::as_str) {
            entity.add(Element::new(config.id_field.clone(), id)?);
        }
    }
    Ok(entity)
}

/// Reads every hit of a search response.
pub fn entities_from_response(
    name: &str,
    response: &Json,
    config: &ElasticsearchConfig,
) -> ModelResult<Vec<Entity>> {
    let hits = response
        .pointer("/hits/hits")
        .and_then(Json::as_array)
        .ok_or_else(|| ModelError::configuration("search response has no hits.hits array"))?;
    hits.iter()
        .map(|hit| entity_from_hit(name, hit, config))
        .collect()
}
