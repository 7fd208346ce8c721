//! The entity manager trait.
//!
//! This module defines [`EntityManager`], the adapter-facing set of
//! operations every backend exposes over [`Entity`] values: insert, update,
//! select, delete and count.

use async_trait::async_trait;

use tessera_model::{DeleteQuery, Entity, SelectQuery};

use crate::error::{BackendError, StorageResult};

/// Core entity operations.
///
/// Queries are rendered through the backend's translator before any data is
/// touched, so an unsupported condition fails the call without side effects.
///
/// # Example
///
/// ```ignore
/// use tessera_model::{Condition, Element, Entity, SelectQuery};
/// use tessera_persistence::core::EntityManager;
///
/// async fn example<M: EntityManager>(manager: &M) -> StorageResult<()> {
///     let ada = Entity::new("person")?
///         .with_element(Element::new("name", "Ada")?)
///         .with_element(Element::new("age", 10)?);
///     manager.insert(ada).await?;
///
///     let query = SelectQuery::new("person")?
///         .with_condition(Condition::eq(Element::new("name", "Ada")?));
///     let found = manager.single_result(&query).await?;
///     assert!(found.is_some());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait EntityManager: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts an entity.
    ///
    /// # Returns
    ///
    /// The entity as stored, including any generated identifier.
    async fn insert(&self, entity: Entity) -> StorageResult<Entity>;

    /// Inserts several entities, in order.
    async fn insert_all(&self, entities: Vec<Entity>) -> StorageResult<Vec<Entity>> {
        let mut stored = Vec::with_capacity(entities.len());
        for entity in entities {
            stored.push(self.insert(entity).await?);
        }
        Ok(stored)
    }

    /// Replaces the stored entity with the same identifier.
    ///
    /// # Errors
    ///
    /// * `StorageError::Model(NullArgument)` - If the entity has no identifier
    /// * `StorageError::Backend(NotFound)` - If no stored entity has that identifier
    async fn update(&self, entity: Entity) -> StorageResult<Entity>;

    /// Returns every entity matching the query.
    async fn select(&self, query: &SelectQuery) -> StorageResult<Vec<Entity>>;

    /// Returns the only entity matching the query, if any.
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend(NonUniqueResult)` - If more than one entity matches
    async fn single_result(&self, query: &SelectQuery) -> StorageResult<Option<Entity>> {
        let mut results = self.select(query).await?;
        match results.len() {
            0 => Ok(None),
            1 => Ok(results.pop()),
            count => Err(BackendError::NonUniqueResult {
                entity: query.target().to_string(),
                count,
            }
            .into()),
        }
    }

    /// Deletes every entity matching the query.
    ///
    /// # Returns
    ///
    /// The number of deleted entities.
    async fn delete(&self, query: &DeleteQuery) -> StorageResult<u64>;

    /// Counts the stored entities with the given name.
    async fn count(&self, entity_name: &str) -> StorageResult<u64>;
}
