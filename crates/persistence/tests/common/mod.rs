//! Shared fixtures for the persistence integration tests.

#![allow(dead_code)]

use tessera_model::{Condition, Element, Entity, Value};

/// Builds a `person` entity with a name and an age.
pub fn person(name: &str, age: i64) -> Entity {
    Entity::new("person")
        .unwrap()
        .with_element(Element::new("id", name.to_lowercase()).unwrap())
        .with_element(Element::new("name", name).unwrap())
        .with_element(Element::new("age", age).unwrap())
}

/// The sample population used by the condition algebra tests.
pub fn population() -> Vec<Entity> {
    vec![person("Kid", 10), person("Adult", 30), person("Senior", 70)]
}

pub fn age(value: i64) -> Element {
    Element::new("age", value).unwrap()
}

pub fn name(value: &str) -> Element {
    Element::new("name", value).unwrap()
}

/// `age > 18 AND age < 65`
pub fn working_age() -> Condition {
    Condition::and([Condition::gt(age(18)), Condition::lt(age(65))]).unwrap()
}

/// `age > 18 OR age < 65`
pub fn working_age_disjunction() -> Condition {
    Condition::or([Condition::gt(age(18)), Condition::lt(age(65))]).unwrap()
}

/// `code IN ["A", "B", "C"]`
pub fn code_in_abc() -> Condition {
    Condition::in_list(Element::new("code", Value::sequence(["A", "B", "C"])).unwrap())
}

/// Names of the entities, in order.
pub fn names(entities: &[Entity]) -> Vec<String> {
    entities
        .iter()
        .map(|entity| entity.find_value::<String>("name").unwrap().unwrap())
        .collect()
}
