use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde_json::Value;
use std::sync::Arc;

use crate::handlers::data::utils::{record_id, require};
use crate::middleware::ApiResult;
use crate::models::{Id, School};
use crate::storage::MemStorage;

use super::{listing, required_day, DateQuery};

/// GET /api/schools/:id/school-admins
pub async fn school_admins(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.school_admins_by_school(id).await)
}

/// GET /api/schools/:id/teachers
pub async fn teachers(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.teachers_by_school(id).await)
}

/// GET /api/schools/:id/students
pub async fn students(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.students_by_school(id).await)
}

/// GET /api/schools/:id/classes
pub async fn classes(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.classes_by_school(id).await)
}

/// GET /api/schools/:id/subjects
pub async fn subjects(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.subjects_by_school(id).await)
}

/// GET /api/schools/:id/exams
pub async fn exams(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.exams_by_school(id).await)
}

/// GET /api/schools/:id/fee-structures
pub async fn fee_structures(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.fee_structures_by_school(id).await)
}

/// GET /api/schools/:id/bills
pub async fn bills(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.bills_by_school(id).await)
}

/// GET /api/schools/:id/messages
pub async fn messages(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    listing(storage.messages_by_school(id).await)
}

/// GET /api/schools/:id/teacher-attendance?date=YYYY-MM-DD
pub async fn teacher_attendance(
    State(storage): State<Arc<MemStorage>>,
    path: Result<Path<Id>, PathRejection>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Vec<Value>> {
    let id = require::<School>(&storage, record_id(path)?).await?.id;
    let day = required_day(query)?;
    listing(storage.teacher_attendance_by_school(id, day).await)
}
