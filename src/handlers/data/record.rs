use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Id;
use crate::storage::{Entity, MemStorage};

use super::utils::{not_found, patch_object, record_id};

/// GET /api/:collection/:id - Get a single record by ID
pub async fn get<T: Entity>(
    State(storage): State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
) -> ApiResult<Value> {
    let id = record_id(path)?;
    let record = storage.repo::<T>().get(id).await.ok_or_else(|| not_found::<T>(id))?;
    Ok(ApiResponse::success(record.present()?))
}

/// PUT /api/:collection/:id - Merge the body into the record
///
/// Fields absent from the body keep their values, so PUT behaves like PATCH.
pub async fn put<T: Entity>(
    state: State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    patch::<T>(state, path, payload).await
}

/// PATCH /api/:collection/:id - Merge the body into the record
pub async fn patch<T: Entity>(
    State(storage): State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id = record_id(path)?;
    let Json(body) = payload?;
    let changes = patch_object(body)?;

    let record = storage
        .repo::<T>()
        .update(id, changes)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;
    Ok(ApiResponse::success(record.present()?))
}

/// DELETE /api/:collection/:id - Remove a record
pub async fn delete<T: Entity>(
    State(storage): State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
) -> ApiResult<Value> {
    let id = record_id(path)?;
    if !storage.repo::<T>().delete(id).await {
        return Err(not_found::<T>(id));
    }
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
