//! Reading Solr documents back into entities.

use serde_json::Value as Json;

use tessera_model::{Element, Entity, ModelError, ModelResult, convert};

use super::config::SolrConfig;

/// Reads a document from `response.docs` into an entity named `name`.
///
/// The entity discriminator field is dropped.
pub fn entity_from_document(name: &str, document: Json, config: &SolrConfig) -> ModelResult<Entity> {
    let mut entity = Entity::from_json(name, document)?;
    entity.remove(&config.entity_field);
    Ok(entity)
}

/// Renders an entity as an indexable document, discriminator included.
///
/// # Errors
///
/// Returns [`ModelError::Configuration`] if the entity already carries an
/// element named like the discriminator.
pub fn document_from_entity(entity: &Entity, config: &SolrConfig) -> ModelResult<Json> {
    if entity.contains(&config.entity_field) {
        return Err(ModelError::configuration(format!(
            "element '{}' is reserved for the entity name",
            config.entity_field
        )));
    }
    let discriminator = Element::new(config.entity_field.clone(), entity.name())?;
    let tagged = entity.clone().with_element(discriminator);
    Ok(convert(&tessera_model::Value::Structure(tagged.to_map())))
}
