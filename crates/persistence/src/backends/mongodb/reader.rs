//! Conversion between entities and MongoDB documents.

use serde_json::{Map, Value as Json};

use tessera_model::{Element, Entity, ModelError, ModelResult};

use super::config::MongoConfig;
use super::extjson;

/// Renders an entity as an insertable document.
///
/// The id element becomes `_id`. When several elements share a name the
/// first one wins, matching [`Entity::to_map`].
pub fn document_from_entity(entity: &Entity, config: &MongoConfig) -> Json {
    let mut document = Map::new();
    for element in entity.elements() {
        let field = config.document_field(element.name());
        if !document.contains_key(field) {
            document.insert(field.to_string(), extjson::encode(element.value()));
        }
    }
    Json::Object(document)
}

/// Reads a returned document into an entity named `name`.
///
/// `_id` is renamed to the configured id element. Top-level `null` fields
/// are treated as absent.
///
/// # Errors
///
/// Returns [`ModelError::Configuration`] if the document is not an object,
/// or a coercion error for a malformed Extended JSON wrapper.
pub fn entity_from_document(name: &str, document: Json, config: &MongoConfig) -> ModelResult<Entity> {
    let Json::Object(fields) = document else {
        return Err(ModelError::configuration(format!(
            "a {} document must be a JSON object",
            name
        )));
    };

    let mut entity = Entity::new(name)?;
    for (field, value) in fields {
        if value.is_null() {
            continue;
        }
        let element_name = if field == "_id" {
            config.id_field.clone()
        } else {
            field
        };
        entity.add(Element::new(element_name, extjson::decode(value)?)?);
    }
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_model::Value;

    #[test]
    fn test_document_round_trip() {
        let config = MongoConfig::default();
        let entity = Entity::new("person")
            .unwrap()
            .with_element(Element::new("id", "p-1").unwrap())
            .with_element(Element::new("name", "Ada").unwrap())
            .with_element(Element::new("age", 10).unwrap());

        let document = document_from_entity(&entity, &config);
        assert_eq!(document, json!({"_id": "p-1", "name": "Ada", "age": 10}));

        let read = entity_from_document("person", document, &config).unwrap();
        assert_eq!(read.find("id").unwrap().value(), &Value::from("p-1"));
        assert_eq!(read.find_value::<i32>("age").unwrap().unwrap(), 10);
    }

    #[test]
    fn test_reader_skips_null_fields() {
        let read = entity_from_document(
            "person",
            json!({"_id": "p-2", "nickname": null}),
            &MongoConfig::default(),
        )
        .unwrap();
        assert_eq!(read.names(), vec!["id"]);
    }

    #[test]
    fn test_reader_rejects_non_object() {
        assert!(entity_from_document("person", json!([1]), &MongoConfig::default()).is_err());
    }
}
