use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use serde_json::Value;
use std::sync::Arc;

use crate::handlers::data::utils::{record_id, require};
use crate::middleware::ApiResult;
use crate::models::{Assignment, Exam, ExamSubject, Id};
use crate::storage::MemStorage;

use super::listing;

/// GET /api/assignments/:id/submissions
pub async fn assignment_submissions(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Assignment>(&storage, record_id(path)?).await?.id;
    listing(storage.submissions_by_assignment(id).await)
}

/// GET /api/exams/:id/exam-subjects
pub async fn exam_subjects(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<Exam>(&storage, record_id(path)?).await?.id;
    listing(storage.exam_subjects_by_exam(id).await)
}

/// GET /api/exam-subjects/:id/marks
pub async fn exam_subject_marks(State(storage): State<Arc<MemStorage>>, path: Result<Path<Id>, PathRejection>) -> ApiResult<Vec<Value>> {
    let id = require::<ExamSubject>(&storage, record_id(path)?).await?.id;
    listing(storage.marks_by_exam_subject(id).await)
}
