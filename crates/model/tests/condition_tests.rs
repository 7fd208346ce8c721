//! Integration tests for condition and query construction.

use std::sync::Arc;
use std::thread;

use serde_json::json;

use tessera_model::{
    Condition, ConditionOperator, DeleteQuery, Element, ModelError, SelectQuery, Sort, Value,
};

fn field(name: &str, value: impl Into<Value>) -> Element {
    Element::new(name, value).unwrap()
}

// ============================================================================
// Factory Validation Tests
// ============================================================================

/// Test that arity is validated at construction time.
#[test]
fn test_factories_fail_fast() {
    assert!(matches!(
        Condition::and(std::iter::empty()),
        Err(ModelError::Configuration { .. })
    ));
    assert!(matches!(
        Condition::or(Vec::new()),
        Err(ModelError::Configuration { .. })
    ));
    assert!(matches!(
        Condition::not(None),
        Err(ModelError::NullArgument { .. })
    ));
    assert!(matches!(
        Condition::between(field("age", Value::sequence([1, 2, 3]))),
        Err(ModelError::Configuration { .. })
    ));
}

/// Test that a single-child AND is valid.
#[test]
fn test_single_child_and() {
    let condition = Condition::and([Condition::eq(field("a", 1))]).unwrap();
    assert_eq!(condition.operator(), ConditionOperator::And);
}

/// Test deep nesting without a fixed depth bound.
#[test]
fn test_deep_nesting() {
    let mut condition = Condition::eq(field("depth", 0));
    for depth in 1..200 {
        condition = Condition::or([condition, Condition::eq(field("depth", depth))]).unwrap();
    }
    assert_eq!(condition.elements().len(), 200);
}

/// Test that negate leaves the receiver intact.
#[test]
fn test_negate_is_non_destructive() {
    let base = Condition::gt(field("age", 18));
    let before = base.clone();
    let negated = base.negate();
    assert_eq!(base, before);
    assert_eq!(negated, Condition::not(before).unwrap());
    assert_eq!(negated.to_string(), "NOT (age > 18)");
}

/// Test that conditions can be shared across threads.
#[test]
fn test_conditions_are_shareable() {
    let condition = Arc::new(
        Condition::and([
            Condition::gte(field("age", 18)),
            Condition::lt(field("age", 65)),
        ])
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let condition = Arc::clone(&condition);
            thread::spawn(move || condition.to_string())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "(age >= 18 AND age < 65)");
    }
}

// ============================================================================
// Query Document Tests
// ============================================================================

/// Test loading a select query from its JSON document.
#[test]
fn test_select_query_document() {
    let query: SelectQuery = serde_json::from_value(json!({
        "target": "person",
        "condition": {"or": [
            {"like": {"name": "name", "value": "A%"}},
            {"between": {"name": "age", "value": [18, 65]}}
        ]},
        "sorts": [{"field": "name"}],
        "skip": 10,
        "limit": 5,
        "projection": ["name", "age"]
    }))
    .unwrap();

    assert_eq!(query.target(), "person");
    assert_eq!(query.sorts(), &[Sort::asc("name")]);
    assert_eq!(query.skip(), 10);
    assert_eq!(query.limit(), Some(5));
    assert_eq!(query.projection().len(), 2);
    assert_eq!(
        query.condition().unwrap().to_string(),
        "(name LIKE \"A%\" OR age BETWEEN 18 AND 65)"
    );
}

/// Test that invalid documents are rejected with the factory's error.
#[test]
fn test_invalid_documents() {
    let not_text: Result<SelectQuery, _> = serde_json::from_value(json!({
        "target": "person",
        "condition": {"like": {"name": "age", "value": 3}}
    }));
    assert!(not_text.unwrap_err().to_string().contains("LIKE"));

    let empty_target: Result<DeleteQuery, _> = serde_json::from_value(json!({"target": ""}));
    assert!(empty_target.is_err());

    let empty_name: Result<Condition, _> =
        serde_json::from_value(json!({"eq": {"name": "", "value": 1}}));
    assert!(empty_name.is_err());
}
