use async_trait::async_trait;
use serde_json::{Map, Value};

use super::entity::Entity;
use super::error::StorageError;
use super::table::MemTable;
use crate::models::Id;

/// CRUD contract the HTTP layer is written against.
///
/// `MemTable` is the only implementation today; a database-backed table can
/// slot in behind the same calls.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get(&self, id: Id) -> Option<T>;
    async fn list(&self) -> Vec<T>;
    async fn count(&self) -> usize;
    async fn create(&self, new: T::New) -> Result<T, StorageError>;
    async fn update(&self, id: Id, patch: Map<String, Value>) -> Result<Option<T>, StorageError>;
    async fn delete(&self, id: Id) -> bool;
}

#[async_trait]
impl<T: Entity> Repository<T> for MemTable<T> {
    async fn get(&self, id: Id) -> Option<T> {
        MemTable::get(self, id).await
    }

    async fn list(&self) -> Vec<T> {
        MemTable::list(self).await
    }

    async fn count(&self) -> usize {
        MemTable::count(self).await
    }

    async fn create(&self, new: T::New) -> Result<T, StorageError> {
        MemTable::create(self, new).await
    }

    async fn update(&self, id: Id, patch: Map<String, Value>) -> Result<Option<T>, StorageError> {
        MemTable::update(self, id, patch).await
    }

    async fn delete(&self, id: Id) -> bool {
        MemTable::delete(self, id).await
    }
}
