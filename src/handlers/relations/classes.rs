use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde_json::Value;
use std::sync::Arc;

use crate::handlers::data::utils::{record_id, require};
use crate::middleware::ApiResult;
use crate::models::{Class, Id};
use crate::storage::MemStorage;

use super::{listing, required_day, DateQuery};

/// GET /api/classes/:id/students
pub async fn students(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.students_by_class(id).await)
}

/// GET /api/classes/:id/class-subjects
pub async fn class_subjects(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.class_subjects_by_class(id).await)
}

/// GET /api/classes/:id/lesson-plans
pub async fn lesson_plans(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.lesson_plans_by_class(id).await)
}

/// GET /api/classes/:id/assignments
pub async fn assignments(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.assignments_by_class(id).await)
}

/// GET /api/classes/:id/exams
pub async fn exams(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.exams_by_class(id).await)
}

/// GET /api/classes/:id/fee-structures
pub async fn fee_structures(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.fee_structures_by_class(id).await)
}

/// GET /api/classes/:id/class-messages
pub async fn class_messages(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    listing(storage.class_messages_by_class(id).await)
}

/// GET /api/classes/:id/attendance?date=YYYY-MM-DD
pub async fn attendance(
    State(storage): State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Vec<Value>> {
    let id = require::<Class>(&storage, record_id(path)?).await?.id;
    let day = required_day(query)?;
    listing(storage.student_attendance_by_class(id, day).await)
}
