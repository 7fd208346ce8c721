//! In-process entity store.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use tessera_model::{Condition, DeleteQuery, Element, Entity, ModelError, SelectQuery, Sort};

use super::config::MemoryConfig;
use super::dialect::{MemoryDialect, Predicate, compare_values, sort_order};
use crate::core::{EntityManager, Translator};
use crate::error::{BackendError, StorageResult};

/// An [`EntityManager`] keeping entities in memory, grouped by entity name.
///
/// Entities are returned in insertion order unless the query sorts them.
/// Conditions are compiled before the store is locked, so a query that
/// cannot be translated has no effect.
///
/// # Example
///
/// ```
/// use tessera_model::{Condition, Element, Entity, SelectQuery};
/// use tessera_persistence::backends::memory::MemoryBackend;
/// use tessera_persistence::core::EntityManager;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MemoryBackend::default();
/// backend
///     .insert(Entity::new("person")?.with_element(Element::new("name", "Ada")?))
///     .await?;
///
/// let query = SelectQuery::new("person")?
///     .with_condition(Condition::eq(Element::new("name", "Ada")?));
/// assert_eq!(backend.select(&query).await?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    config: MemoryConfig,
    translator: Translator<MemoryDialect>,
    entities: RwLock<HashMap<String, Vec<Entity>>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidConfiguration` if the config is invalid.
    pub fn new(config: MemoryConfig) -> StorageResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            translator: Translator::default(),
            entities: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    fn compile(&self, condition: Option<&Condition>) -> StorageResult<Option<Predicate>> {
        Ok(condition
            .map(|condition| self.translator.translate(condition))
            .transpose()?)
    }
}

/// Orders entities by each sort in turn. Missing elements sort last in
/// either direction; incomparable values keep insertion order.
fn sort_entities(entities: &mut [Entity], sorts: &[Sort]) {
    entities.sort_by(|a, b| {
        for sort in sorts {
            let ordering = match (a.find(&sort.field), b.find(&sort.field)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => {
                    let ordering = sort_order(x.value(), y.value());
                    if sort.is_descending() {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl EntityManager for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, mut entity: Entity) -> StorageResult<Entity> {
        if self.config.generate_ids && !entity.contains(&self.config.id_field) {
            let id = Uuid::new_v4().to_string();
            trace!(entity = %entity.name(), id = %id, "Generated id");
            entity.add(Element::new(self.config.id_field.clone(), id)?);
        }

        let mut entities = self.entities.write();
        entities
            .entry(entity.name().to_string())
            .or_default()
            .push(entity.clone());
        debug!(entity = %entity.name(), elements = entity.len(), "Inserted entity");
        Ok(entity)
    }

    async fn update(&self, entity: Entity) -> StorageResult<Entity> {
        let id = entity
            .find(&self.config.id_field)
            .map(|element| element.value().clone())
            .ok_or_else(|| ModelError::null_argument("id"))?;

        let mut entities = self.entities.write();
        let stored = entities
            .get_mut(entity.name())
            .and_then(|bucket| {
                bucket.iter_mut().find(|candidate| {
                    candidate
                        .find(&self.config.id_field)
                        .is_some_and(|element| {
                            compare_values(element.value(), &id) == Some(Ordering::Equal)
                        })
                })
            })
            .ok_or_else(|| BackendError::NotFound {
                entity: entity.name().to_string(),
                id: id.to_string(),
            })?;

        *stored = entity.clone();
        debug!(entity = %entity.name(), id = %id, "Updated entity");
        Ok(entity)
    }

    async fn select(&self, query: &SelectQuery) -> StorageResult<Vec<Entity>> {
        let predicate = self.compile(query.condition())?;

        let mut results: Vec<Entity> = {
            let entities = self.entities.read();
            entities
                .get(query.target())
                .map(|bucket| {
                    bucket
                        .iter()
                        .filter(|entity| predicate.as_ref().is_none_or(|p| p.matches(entity)))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        sort_entities(&mut results, query.sorts());

        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = query
            .limit()
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let results: Vec<Entity> = results
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|entity| {
                if query.projection().is_empty() {
                    entity
                } else {
                    entity.project(query.projection())
                }
            })
            .collect();

        debug!(entity = %query.target(), matched = results.len(), "Selected entities");
        Ok(results)
    }

    async fn delete(&self, query: &DeleteQuery) -> StorageResult<u64> {
        let predicate = self.compile(query.condition())?;

        let mut entities = self.entities.write();
        let removed = match entities.get_mut(query.target()) {
            Some(bucket) => {
                let before = bucket.len();
                match &predicate {
                    Some(predicate) => bucket.retain(|entity| !predicate.matches(entity)),
                    None => bucket.clear(),
                }
                before - bucket.len()
            }
            None => 0,
        };

        debug!(entity = %query.target(), removed, "Deleted entities");
        Ok(removed as u64)
    }

    async fn count(&self, entity_name: &str) -> StorageResult<u64> {
        let entities = self.entities.read();
        Ok(entities.get(entity_name).map_or(0, |bucket| bucket.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use tessera_model::Value;

    fn person(name: &str, age: i64) -> Entity {
        Entity::new("person")
            .unwrap()
            .with_element(Element::new("id", name.to_lowercase()).unwrap())
            .with_element(Element::new("name", name).unwrap())
            .with_element(Element::new("age", age).unwrap())
    }

    #[tokio::test]
    async fn test_generate_ids() {
        let backend = MemoryBackend::new(MemoryConfig {
            generate_ids: true,
            ..Default::default()
        })
        .unwrap();
        let stored = backend
            .insert(Entity::new("person").unwrap())
            .await
            .unwrap();
        let id: Uuid = stored.find_value("id").unwrap().unwrap();
        assert_eq!(id.get_version_num(), 4);
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let backend = MemoryBackend::default();
        backend.insert(person("Ada", 10)).await.unwrap();

        backend.update(person("Ada", 11)).await.unwrap();

        let all = backend
            .select(&SelectQuery::new("person").unwrap())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].find("age").unwrap().value(), &Value::from(11));
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let backend = MemoryBackend::default();
        let err = backend
            .update(Entity::new("person").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Model(ModelError::NullArgument { argument: "id" })
        ));

        let err = backend.update(person("Ghost", 1)).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::NotFound { .. })
        ));
    }

    #[test]
    fn test_sort_missing_last() {
        let mut entities = vec![
            Entity::new("person").unwrap(),
            person("Ada", 10),
            person("Grace", 30),
        ];
        sort_entities(&mut entities, &[Sort::desc("age")]);
        let names: Vec<Option<String>> = entities
            .iter()
            .map(|e| e.find_value::<String>("name").map(|r| r.unwrap()))
            .collect();
        assert_eq!(
            names,
            vec![Some("Grace".to_string()), Some("Ada".to_string()), None]
        );
    }

    #[test]
    fn test_sort_mixed_kinds_is_deterministic() {
        let scored = |score: Value| {
            Entity::new("player")
                .unwrap()
                .with_element(Element::new("score", score).unwrap())
        };
        let mut entities = vec![
            scored(Value::from("ten")),
            scored(Value::from(f64::NAN)),
            scored(Value::from(3)),
            scored(Value::from(true)),
            scored(Value::from(1.5)),
            scored(Value::from("five")),
            scored(Value::from(f64::NEG_INFINITY)),
        ];
        let expected = vec![
            Value::from(f64::NEG_INFINITY),
            Value::from(1.5),
            Value::from(3),
            Value::from(f64::NAN),
            Value::from(true),
            Value::from("five"),
            Value::from("ten"),
        ];

        let render = |entities: &[Entity]| -> Vec<String> {
            entities
                .iter()
                .map(|e| format!("{:?}", e.find("score").unwrap().value()))
                .collect()
        };
        let expected: Vec<String> = expected.iter().map(|v| format!("{:?}", v)).collect();

        sort_entities(&mut entities, &[Sort::asc("score")]);
        assert_eq!(render(&entities), expected);

        entities.reverse();
        sort_entities(&mut entities, &[Sort::asc("score")]);
        assert_eq!(render(&entities), expected);
    }
}
