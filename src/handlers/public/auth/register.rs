// handlers/public/auth/register.rs - POST /api/register handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{NewUser, User};
use crate::storage::{Entity, MemStorage};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/**
 * POST /api/register - Register a new user account
 *
 * Expected Input:
 * ```json
 * {
 *   "email": "string",        // Required, must contain '@'
 *   "password": "string",     // Required, at least 6 characters
 *   "full_name": "string",    // Required
 *   "role": "teacher",        // super_admin | school_admin | teacher | student | parent
 *   "phone_number": "string"  // Optional
 * }
 * ```
 *
 * Responds 201 with the user (without password), 409 when the email is taken.
 */
pub async fn register_post(
    State(storage): State<Arc<MemStorage>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;
    let new: NewUser = serde_json::from_value(body)
        .map_err(|e| ApiError::validation_error(format!("Invalid registration: {}", e)))?;

    if !new.email.contains('@') {
        return Err(ApiError::validation_error("Email address must contain '@'"));
    }
    if new.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation_error(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    // Duplicate emails are rejected atomically by the users table
    let user: User = storage.repo::<User>().create(new).await?;
    tracing::info!("Registered user {} as {}", user.id, user.role.as_str());

    Ok(ApiResponse::created(user.present()?))
}
