use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::error::StorageError;
use super::memory::MemStorage;
use super::table::MemTable;
use crate::models::Id;

/// A record kind stored in its own table.
///
/// `New` is the insert payload; `build` turns it into a stored record once the
/// table has picked an id, filling any storage-assigned fields.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type New: DeserializeOwned + Send + 'static;

    /// Collection name used for routes, fixtures and log lines
    const COLLECTION: &'static str;

    /// Fields set at creation that a patch may not overwrite (`id` is always protected)
    const READONLY_FIELDS: &'static [&'static str] = &[];

    fn build(id: Id, new: Self::New) -> Self;

    fn table(storage: &MemStorage) -> &MemTable<Self>;

    fn validate(&self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Uniqueness check against another stored record
    fn conflicts_with(&self, _other: &Self) -> Option<String> {
        None
    }

    /// Rewrite an insert payload before the table is locked (e.g. hash secrets)
    fn prepare_new(_new: &mut Self::New) -> Result<(), StorageError> {
        Ok(())
    }

    /// Rewrite an incoming patch before the table is locked
    fn prepare_patch(_patch: &mut Map<String, Value>) -> Result<(), StorageError> {
        Ok(())
    }

    /// JSON shape handed to clients
    fn present(&self) -> Result<Value, StorageError> {
        Ok(serde_json::to_value(self)?)
    }
}

pub(crate) fn require_text(collection: &str, field: &str, value: &str) -> Result<(), StorageError> {
    if value.trim().is_empty() {
        return Err(StorageError::Validation(format!("{}.{} must not be empty", collection, field)));
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    collection: &str,
    field: &str,
    value: &rust_decimal::Decimal,
) -> Result<(), StorageError> {
    if *value < rust_decimal::Decimal::ZERO {
        return Err(StorageError::Validation(format!("{}.{} must not be negative", collection, field)));
    }
    Ok(())
}
