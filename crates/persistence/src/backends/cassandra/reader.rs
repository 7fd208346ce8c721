//! Reading CQL rows back into entities.

use tessera_model::{Element, Entity, ModelResult, Value};

/// Builds an entity from a row's `(column, value)` pairs.
///
/// Null columns (`None`) are absent from the entity; Cassandra does not
/// distinguish an unset column from a null one.
pub fn entity_from_row<I, K>(name: &str, columns: I) -> ModelResult<Entity>
where
    I: IntoIterator<Item = (K, Option<Value>)>,
    K: Into<String>,
{
    let mut entity = Entity::new(name)?;
    for (column, value) in columns {
        if let Some(value) = value {
            entity.add(Element::new(column, value)?);
        }
    }
    Ok(entity)
}

/// Renders an entity as an `INSERT` statement's columns and parameters.
pub fn insert_columns(entity: &Entity) -> (Vec<String>, Vec<Value>) {
    entity
        .to_map()
        .into_iter()
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_columns_are_absent() {
        let entity = entity_from_row(
            "person",
            [
                ("name", Some(Value::from("Ada"))),
                ("nickname", None),
                ("age", Some(Value::from(10))),
            ],
        )
        .unwrap();
        assert_eq!(entity.names(), vec!["name", "age"]);
    }

    #[test]
    fn test_insert_columns_are_sorted() {
        let entity = Entity::new("person")
            .unwrap()
            .with_element(Element::new("name", "Ada").unwrap())
            .with_element(Element::new("age", 10).unwrap());
        let (columns, values) = insert_columns(&entity);
        assert_eq!(columns, vec!["age", "name"]);
        assert_eq!(values, vec![Value::from(10), Value::from("Ada")]);
    }
}
