use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::entity::Entity;
use super::error::StorageError;
use crate::models::Id;

/// Process-lifetime map of one entity kind with its own id counter.
///
/// Rows live in a `BTreeMap` so listing order is ascending id, which is also
/// insertion order since ids only grow. The counter sits under the same lock
/// as the rows: an id is picked and its row inserted in one critical section.
pub struct MemTable<T> {
    inner: RwLock<TableInner<T>>,
}

struct TableInner<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T: Entity> Default for MemTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemTable<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn get(&self, id: Id) -> Option<T> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    pub async fn list(&self) -> Vec<T> {
        self.inner.read().await.rows.values().cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    /// First record (lowest id) matching the predicate
    pub async fn find_one<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.inner.read().await.rows.values().find(|row| predicate(row)).cloned()
    }

    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub async fn create(&self, mut new: T::New) -> Result<T, StorageError> {
        T::prepare_new(&mut new)?;
        let mut inner = self.inner.write().await;

        let id = inner.next_id;
        let record = T::build(id, new);
        record.validate()?;
        if let Some(reason) = inner.rows.values().find_map(|other| record.conflicts_with(other)) {
            return Err(StorageError::Conflict(reason));
        }

        // Only consume the id once the record is accepted
        inner.next_id += 1;
        inner.rows.insert(id, record.clone());
        tracing::debug!("Created {} record {}", T::COLLECTION, id);
        Ok(record)
    }

    /// Shallow-merge `patch` over the stored record. `Ok(None)` when the id is unknown.
    pub async fn update(&self, id: Id, mut patch: Map<String, Value>) -> Result<Option<T>, StorageError> {
        T::prepare_patch(&mut patch)?;
        let mut inner = self.inner.write().await;
        let Some(current) = inner.rows.get(&id) else {
            return Ok(None);
        };

        let merged = merge_patch(current, patch)?;
        merged.validate()?;
        if let Some(reason) = inner
            .rows
            .iter()
            .filter(|(other_id, _)| **other_id != id)
            .find_map(|(_, other)| merged.conflicts_with(other))
        {
            return Err(StorageError::Conflict(reason));
        }

        inner.rows.insert(id, merged.clone());
        tracing::debug!("Updated {} record {}", T::COLLECTION, id);
        Ok(Some(merged))
    }

    pub async fn delete(&self, id: Id) -> bool {
        let removed = self.inner.write().await.rows.remove(&id).is_some();
        if removed {
            tracing::debug!("Deleted {} record {}", T::COLLECTION, id);
        }
        removed
    }

    /// Drop every row. The id counter keeps running.
    pub async fn clear(&self) {
        self.inner.write().await.rows.clear();
    }
}

fn merge_patch<T: Entity>(current: &T, patch: Map<String, Value>) -> Result<T, StorageError> {
    let mut value = serde_json::to_value(current)?;
    let fields = value.as_object_mut().ok_or_else(|| {
        StorageError::Validation(format!("{} records must serialize to objects", T::COLLECTION))
    })?;

    for (key, val) in patch {
        if key == "id" || T::READONLY_FIELDS.contains(&key.as_str()) {
            tracing::warn!("Attempted to set system field '{}' on {} - ignoring", key, T::COLLECTION);
            continue;
        }
        fields.insert(key, val);
    }

    serde_json::from_value(value)
        .map_err(|e| StorageError::Validation(format!("invalid {} update: {}", T::COLLECTION, e)))
}
