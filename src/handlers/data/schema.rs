use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

use crate::filter::Filter;
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::{Entity, MemStorage};

use super::utils::{present_all, ListQuery};

/// GET /api/:collection - List records in id order
pub async fn get<T: Entity>(
    State(storage): State<Arc<MemStorage>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Value>> {
    let Query(query) = query?;

    let mut filter = Filter::new(T::COLLECTION);
    if let Some(order) = query.order {
        filter.order(Value::String(order))?;
    }
    filter.limit(query.limit, query.offset)?;

    let rows = storage.repo::<T>().list().await;
    Ok(ApiResponse::success(filter.apply(present_all(&rows)?)))
}

/// POST /api/:collection - Create a record
pub async fn post<T: Entity>(
    State(storage): State<Arc<MemStorage>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;
    let new: T::New = serde_json::from_value(body)
        .map_err(|e| crate::error::ApiError::validation_error(format!("Invalid {} record: {}", T::COLLECTION, e)))?;

    let record = storage.repo::<T>().create(new).await?;
    Ok(ApiResponse::created(record.present()?))
}
