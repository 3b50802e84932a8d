use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::Id;
use crate::storage::{Entity, MemStorage};

/// Query string accepted by list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// `field [asc|desc], ...`
    pub order: Option<String>,
}

/// Client-facing JSON for each record
pub fn present_all<T: Entity>(rows: &[T]) -> Result<Vec<Value>, ApiError> {
    rows.iter()
        .map(|row| row.present().map_err(ApiError::from))
        .collect()
}

pub fn record_id(path: Result<Path<Id>, PathRejection>) -> Result<Id, ApiError> {
    let Path(id) = path.map_err(|_| ApiError::bad_request("Record id must be an integer"))?;
    Ok(id)
}

pub fn patch_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::invalid_json("Request body must be a JSON object")),
    }
}

pub fn not_found<T: Entity>(id: Id) -> ApiError {
    ApiError::not_found(format!("Record {} not found in {}", id, T::COLLECTION))
}

/// Fetch the parent record of a relationship route, or 404
pub async fn require<T: Entity>(storage: &MemStorage, id: Id) -> Result<T, ApiError> {
    storage.repo::<T>().get(id).await.ok_or_else(|| not_found::<T>(id))
}
