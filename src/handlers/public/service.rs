use axum::extract::State;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::middleware::{ApiResponse, ApiResult};
use crate::storage::MemStorage;

/// GET / - Service index
pub async fn root() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(ApiResponse::success(json!({
        "name": "School API (Rust)",
        "version": version,
        "description": "Multi-role school management API backed by in-memory storage",
        "endpoints": {
            "home": "/",
            "health": "/health",
            "auth": "/api/register, /api/login",
            "data": "/api/:collection[/:id]",
            "find": "/api/:collection/find",
            "schools": "/api/schools/:id/{school-admins,teachers,students,classes,subjects,exams,fee-structures,bills,messages,teacher-attendance}",
            "classes": "/api/classes/:id/{students,class-subjects,lesson-plans,assignments,exams,fee-structures,class-messages,attendance}",
            "teachers": "/api/teachers/:id/{class-subjects,attendance,lesson-plans,assignments}",
            "students": "/api/students/:id/{attendance,submissions,marks,fee-payments}",
            "users": "/api/users/:id/{teacher,student,parent,school-admin}, /api/users/by-email",
            "messages": "/api/messages/sent/:id, /api/messages/inbox/:id",
        },
        "collections": crate::app::COLLECTIONS,
    })))
}

/// GET /health - Liveness plus per-collection record counts
pub async fn health(State(storage): State<Arc<MemStorage>>) -> ApiResult<Value> {
    let counts: Map<String, Value> = storage
        .counts()
        .await
        .into_iter()
        .map(|(collection, count)| (collection.to_string(), json!(count)))
        .collect();

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "storage": "memory",
        "collections": counts,
    })))
}
