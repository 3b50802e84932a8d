use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::handlers::data::utils::{record_id, require};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Id, Student, Teacher, User};
use crate::storage::{Entity, MemStorage};

use super::listing;

// Teachers

/// GET /api/teachers/:id/class-subjects
pub async fn teacher_class_subjects(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Teacher>(&storage, record_id(path)?).await?.id;
    listing(storage.class_subjects_by_teacher(id).await)
}

/// GET /api/teachers/:id/attendance
pub async fn teacher_attendance(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Teacher>(&storage, record_id(path)?).await?.id;
    listing(storage.teacher_attendance_by_teacher(id).await)
}

/// GET /api/teachers/:id/lesson-plans
pub async fn teacher_lesson_plans(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Teacher>(&storage, record_id(path)?).await?.id;
    listing(storage.lesson_plans_by_teacher(id).await)
}

/// GET /api/teachers/:id/assignments
pub async fn teacher_assignments(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Teacher>(&storage, record_id(path)?).await?.id;
    listing(storage.assignments_by_teacher(id).await)
}

// Students

/// GET /api/students/:id/attendance
pub async fn student_attendance(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Student>(&storage, record_id(path)?).await?.id;
    listing(storage.student_attendance_by_student(id).await)
}

/// GET /api/students/:id/submissions
pub async fn student_submissions(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Student>(&storage, record_id(path)?).await?.id;
    listing(storage.submissions_by_student(id).await)
}

/// GET /api/students/:id/marks
pub async fn student_marks(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Student>(&storage, record_id(path)?).await?.id;
    listing(storage.marks_by_student(id).await)
}

/// GET /api/students/:id/fee-payments
pub async fn student_fee_payments(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Student>(&storage, record_id(path)?).await?.id;
    listing(storage.fee_payments_by_student(id).await)
}

// Users

fn profile<T: Entity>(user_id: Id, found: Option<T>) -> ApiResult<Value> {
    let record = found.ok_or_else(|| ApiError::not_found(format!("User {} has no {} profile", user_id, T::COLLECTION)))?;
    Ok(ApiResponse::success(record.present()?))
}

/// GET /api/users/:id/teacher
pub async fn user_teacher(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Value> {
    let id = require::<User>(&storage, record_id(path)?).await?.id;
    profile(id, storage.teacher_by_user(id).await)
}

/// GET /api/users/:id/student
pub async fn user_student(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Value> {
    let id = require::<User>(&storage, record_id(path)?).await?.id;
    profile(id, storage.student_by_user(id).await)
}

/// GET /api/users/:id/parent
pub async fn user_parent(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Value> {
    let id = require::<User>(&storage, record_id(path)?).await?.id;
    profile(id, storage.parent_by_user(id).await)
}

/// GET /api/users/:id/school-admin
pub async fn user_school_admin(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Value> {
    let id = require::<User>(&storage, record_id(path)?).await?.id;
    profile(id, storage.school_admin_by_user(id).await)
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// GET /api/users/by-email?email=
pub async fn user_by_email(
    State(storage): State<Arc<MemStorage>>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(query) = query?;
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter 'email' is required"))?;
    let user = storage
        .user_by_email(&email)
        .await
        .ok_or_else(|| ApiError::not_found(format!("No user with email '{}'", email)))?;
    Ok(ApiResponse::success(user.present()?))
}
