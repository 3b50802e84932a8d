use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::filter::{Filter, FilterData};
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::{Entity, MemStorage};

use super::utils::present_all;

/// POST /api/:collection/find - Filtered find over one collection
pub async fn find_post<T: Entity>(
    State(storage): State<Arc<MemStorage>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Vec<Value>> {
    let Json(body) = payload?;
    let filter_data: FilterData = if body.is_null() {
        FilterData::default()
    } else {
        serde_json::from_value(body).map_err(|e| ApiError::bad_request(format!("Invalid filter: {}", e)))?
    };

    let mut filter = Filter::new(T::COLLECTION);
    filter.assign(filter_data)?;

    let rows = storage.repo::<T>().list().await;
    Ok(ApiResponse::success(filter.apply(present_all(&rows)?)))
}
