// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::auth;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::{Entity, MemStorage};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    /// Accepted in place of `email`
    pub username: Option<String>,
    pub password: String,
}

/**
 * POST /api/login - Check credentials
 *
 * Expected Input:
 * ```json
 * { "email": "string", "password": "string" }
 * ```
 * `username` may be sent instead of `email`. Responds with the user on a
 * match and 401 otherwise; unknown accounts and wrong passwords look the same.
 */
pub async fn login_post(
    State(storage): State<Arc<MemStorage>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload?;
    let request: LoginRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::validation_error(format!("Invalid login request: {}", e)))?;

    let user = match (request.email.as_deref(), request.username.as_deref()) {
        (Some(email), _) => storage.user_by_email(email).await,
        (None, Some(username)) => storage.user_by_username(username).await,
        (None, None) => return Err(ApiError::validation_error("Either email or username is required")),
    };

    match user {
        Some(user) if auth::verify_password(&request.password, &user.password) => {
            tracing::info!("Login succeeded for user {}", user.id);
            Ok(ApiResponse::success(user.present()?))
        }
        _ => {
            tracing::warn!("Login failed");
            Err(ApiError::unauthorized("Invalid credentials"))
        }
    }
}
