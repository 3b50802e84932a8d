//! Read-only relationship routes, one per storage lookup.
//!
//! Every route first checks that the parent record exists and answers 404
//! otherwise; an existing parent with no children yields an empty list.

pub mod academics;
pub mod classes;
pub mod messages;
pub mod people;
pub mod schools;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Day;
use crate::storage::Entity;

use super::data::utils::present_all;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// `?date=` as a calendar day; missing or unparseable is a 400
pub(crate) fn required_day(query: Result<Query<DateQuery>, QueryRejection>) -> Result<Day, ApiError> {
    let Query(query) = query?;
    let raw = query
        .date
        .ok_or_else(|| ApiError::bad_request("Query parameter 'date' is required"))?;
    Day::parse(&raw).ok_or_else(|| ApiError::bad_request(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

pub(crate) fn listing<T: Entity>(rows: Vec<T>) -> ApiResult<Vec<Value>> {
    Ok(ApiResponse::success(present_all(&rows)?))
}
