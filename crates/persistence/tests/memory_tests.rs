//! Memory backend integration tests.
//!
//! The memory backend executes conditions itself, so these tests check the
//! observable semantics of the condition algebra against stored entities.
//!
//! Run with: `cargo test -p tessera-persistence --features memory -- memory`

#![cfg(feature = "memory")]

mod common;

use common::*;
use tessera_model::{Condition, DeleteQuery, Element, Entity, ModelError, SelectQuery, Sort};
use tessera_persistence::backends::memory::{MemoryBackend, MemoryConfig};
use tessera_persistence::core::EntityManager;
use tessera_persistence::{BackendError, StorageError};

async fn seeded() -> MemoryBackend {
    let backend = MemoryBackend::default();
    backend.insert_all(population()).await.unwrap();
    backend
}

fn select(condition: Condition) -> SelectQuery {
    SelectQuery::new("person").unwrap().with_condition(condition)
}

// ============================================================================
// Negation
// ============================================================================

/// Test that NOT (age = 30) rejects exactly the matching entity.
#[tokio::test]
async fn test_not_equals_rejects_match() {
    let backend = seeded().await;
    let query = select(Condition::not(Condition::eq(age(30))).unwrap());

    let found = backend.select(&query).await.unwrap();
    assert_eq!(names(&found), vec!["Kid", "Senior"]);
}

/// Test that negating a conjunction negates the whole conjunction, not just
/// its first child.
#[tokio::test]
async fn test_not_conjunction() {
    let backend = seeded().await;

    let found = backend.select(&select(working_age().negate())).await.unwrap();
    assert_eq!(names(&found), vec!["Kid", "Senior"]);
}

/// Test that negating a disjunction excludes every entity matching either side.
#[tokio::test]
async fn test_not_disjunction() {
    let backend = seeded().await;
    let condition = Condition::or([Condition::eq(age(10)), Condition::eq(age(70))])
        .unwrap()
        .negate();

    let found = backend.select(&select(condition)).await.unwrap();
    assert_eq!(names(&found), vec!["Adult"]);
}

/// Test that double negation is the identity.
#[tokio::test]
async fn test_double_negation() {
    let backend = seeded().await;
    let condition = Condition::eq(age(30)).negate().negate();

    let found = backend.select(&select(condition)).await.unwrap();
    assert_eq!(names(&found), vec!["Adult"]);
}

// ============================================================================
// Conjunction and Disjunction
// ============================================================================

/// Test that AND and OR of the same children differ on ages {10, 30, 70}.
#[tokio::test]
async fn test_and_differs_from_or() {
    let backend = seeded().await;

    let conjunction = backend.select(&select(working_age())).await.unwrap();
    let disjunction = backend
        .select(&select(working_age_disjunction()))
        .await
        .unwrap();

    assert_eq!(names(&conjunction), vec!["Adult"]);
    assert_eq!(names(&disjunction), vec!["Kid", "Adult", "Senior"]);
    assert_ne!(conjunction, disjunction);
}

/// Test nested compound conditions.
#[tokio::test]
async fn test_nested_compound() {
    let backend = seeded().await;
    let condition = Condition::or([
        Condition::and([Condition::gte(age(30)), Condition::eq(name("Senior"))]).unwrap(),
        Condition::lt(age(18)),
    ])
    .unwrap();

    let found = backend.select(&select(condition)).await.unwrap();
    assert_eq!(names(&found), vec!["Kid", "Senior"]);
}

// ============================================================================
// IN, LIKE and BETWEEN
// ============================================================================

/// Test that IN ["A", "B", "C"] matches "B" and not "D".
#[tokio::test]
async fn test_in_matches_any_member() {
    let backend = MemoryBackend::default();
    for code in ["B", "D"] {
        backend
            .insert(
                Entity::new("person")
                    .unwrap()
                    .with_element(name(code))
                    .with_element(Element::new("code", code).unwrap()),
            )
            .await
            .unwrap();
    }

    let found = backend.select(&select(code_in_abc())).await.unwrap();
    assert_eq!(names(&found), vec!["B"]);
}

/// Test LIKE patterns with both wildcards.
#[tokio::test]
async fn test_like_patterns() {
    let backend = seeded().await;

    let prefix = Condition::like(name("S%")).unwrap();
    let found = backend.select(&select(prefix)).await.unwrap();
    assert_eq!(names(&found), vec!["Senior"]);

    let single = Condition::like(name("K_d")).unwrap();
    let found = backend.select(&select(single)).await.unwrap();
    assert_eq!(names(&found), vec!["Kid"]);
}

/// Test that BETWEEN is inclusive on both bounds.
#[tokio::test]
async fn test_between_inclusive() {
    let backend = seeded().await;
    let condition = Condition::between(
        Element::new("age", tessera_model::Value::sequence([10, 30])).unwrap(),
    )
    .unwrap();

    let found = backend.select(&select(condition)).await.unwrap();
    assert_eq!(names(&found), vec!["Kid", "Adult"]);
}

// ============================================================================
// Round Trip
// ============================================================================

/// Test that an entity selected by name is structurally equal to the one
/// inserted.
#[tokio::test]
async fn test_round_trip() {
    let backend = MemoryBackend::default();
    let ada = Entity::new("person")
        .unwrap()
        .with_element(name("Ada"))
        .with_element(age(10));
    backend.insert(ada.clone()).await.unwrap();

    let found = backend
        .single_result(&select(Condition::eq(name("Ada"))))
        .await
        .unwrap();
    assert_eq!(found, Some(ada));
}

/// Test that single_result rejects several matches.
#[tokio::test]
async fn test_single_result_non_unique() {
    let backend = seeded().await;

    let err = backend
        .single_result(&select(Condition::gt(age(18))))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::NonUniqueResult { count: 2, .. })
    ));

    let none = backend
        .single_result(&select(Condition::gt(age(100))))
        .await
        .unwrap();
    assert!(none.is_none());
}

// ============================================================================
// Query Shape
// ============================================================================

/// Test sort, skip, limit and projection together.
#[tokio::test]
async fn test_sort_skip_limit_projection() {
    let backend = seeded().await;
    let query = SelectQuery::new("person")
        .unwrap()
        .with_sort(Sort::desc("age"))
        .with_skip(1)
        .with_limit(1)
        .with_projection(["name"]);

    let found = backend.select(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].names(), vec!["name"]);
    assert_eq!(names(&found), vec!["Adult"]);
}

/// Test that other entity names are invisible to a query.
#[tokio::test]
async fn test_entities_grouped_by_name() {
    let backend = seeded().await;
    backend
        .insert(Entity::new("pet").unwrap().with_element(name("Rex")))
        .await
        .unwrap();

    assert_eq!(backend.count("person").await.unwrap(), 3);
    assert_eq!(backend.count("pet").await.unwrap(), 1);
    assert_eq!(backend.count("car").await.unwrap(), 0);
}

// ============================================================================
// Delete
// ============================================================================

/// Test conditional and unconditional deletes.
#[tokio::test]
async fn test_delete() {
    let backend = seeded().await;

    let removed = backend
        .delete(&DeleteQuery::new("person").unwrap().with_condition(Condition::lt(age(18))))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(backend.count("person").await.unwrap(), 2);

    let removed = backend
        .delete(&DeleteQuery::new("person").unwrap())
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(backend.count("person").await.unwrap(), 0);
}

// ============================================================================
// Configuration
// ============================================================================

/// Test that an invalid configuration is rejected at construction.
#[test]
fn test_invalid_config() {
    let err = MemoryBackend::new(MemoryConfig {
        id_field: " ".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::InvalidConfiguration { .. })
    ));
}

/// Test that a missing id is reported as a null argument.
#[tokio::test]
async fn test_update_requires_id() {
    let backend = seeded().await;
    let err = backend
        .update(Entity::new("person").unwrap().with_element(name("Nobody")))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Model(ModelError::NullArgument { .. })));
}
