use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::handlers::data::utils::{record_id, require};
use crate::middleware::ApiResult;
use crate::models::{Id, Role, User};
use crate::storage::MemStorage;

use super::listing;

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    /// Role the receiver reads as; defaults to the user's own role
    pub role: Option<String>,
}

/// GET /api/messages/sent/:id
pub async fn sent(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<User>(&storage, record_id(path)?).await?.id;
    listing(storage.messages_by_sender(id).await)
}

/// GET /api/messages/inbox/:id?role=
///
/// Direct messages addressed to the user under that role, plus broadcasts to all.
pub async fn inbox(
    State(storage): State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
    query: Result<Query<InboxQuery>, QueryRejection>,
) -> ApiResult<Vec<Value>> {
    let user = require::<User>(&storage, record_id(path)?).await?;
    let Query(query) = query?;

    let role = match query.role.as_deref() {
        Some(raw) => Role::parse(raw).ok_or_else(|| ApiError::bad_request(format!("Unknown role '{}'", raw)))?,
        None => user.role,
    };
    listing(storage.messages_for_receiver(user.id, role).await)
}
