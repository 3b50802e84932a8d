use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{Day, Id};
use crate::storage::entity::{require_non_negative, require_text, Entity};
use crate::storage::{MemStorage, MemTable, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: Id,
    pub school_id: Id,
    pub grade: String,
    pub section: String,
    pub class_teacher_id: Option<Id>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClass {
    pub school_id: Id,
    pub grade: String,
    pub section: String,
    pub class_teacher_id: Option<Id>,
}

impl Entity for Class {
    type New = NewClass;
    const COLLECTION: &'static str = "classes";

    fn build(id: Id, new: NewClass) -> Self {
        Self {
            id,
            school_id: new.school_id,
            grade: new.grade,
            section: new.section,
            class_teacher_id: new.class_teacher_id,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.classes
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "grade", &self.grade)?;
        require_text(Self::COLLECTION, "section", &self.section)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Id,
    pub school_id: Id,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
    pub school_id: Id,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

impl Entity for Subject {
    type New = NewSubject;
    const COLLECTION: &'static str = "subjects";

    fn build(id: Id, new: NewSubject) -> Self {
        Self {
            id,
            school_id: new.school_id,
            name: new.name,
            code: new.code,
            description: new.description,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.subjects
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "name", &self.name)
    }
}

/// A subject taught in a class, optionally by a given teacher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSubject {
    pub id: Id,
    pub class_id: Id,
    pub subject_id: Id,
    pub teacher_id: Option<Id>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClassSubject {
    pub class_id: Id,
    pub subject_id: Id,
    pub teacher_id: Option<Id>,
}

impl Entity for ClassSubject {
    type New = NewClassSubject;
    const COLLECTION: &'static str = "class_subjects";

    fn build(id: Id, new: NewClassSubject) -> Self {
        Self {
            id,
            class_id: new.class_id,
            subject_id: new.subject_id,
            teacher_id: new.teacher_id,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.class_subjects
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonPlan {
    pub id: Id,
    pub teacher_id: Id,
    pub class_id: Id,
    pub subject_id: Id,
    pub title: String,
    pub content: Option<String>,
    pub date: Day,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLessonPlan {
    pub teacher_id: Id,
    pub class_id: Id,
    pub subject_id: Id,
    pub title: String,
    pub content: Option<String>,
    pub date: Day,
}

impl Entity for LessonPlan {
    type New = NewLessonPlan;
    const COLLECTION: &'static str = "lesson_plans";

    fn build(id: Id, new: NewLessonPlan) -> Self {
        Self {
            id,
            teacher_id: new.teacher_id,
            class_id: new.class_id,
            subject_id: new.subject_id,
            title: new.title,
            content: new.content,
            date: new.date,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.lesson_plans
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "title", &self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Id,
    pub teacher_id: Id,
    pub class_id: Id,
    pub subject_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Day,
    pub max_marks: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignment {
    pub teacher_id: Id,
    pub class_id: Id,
    pub subject_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Day,
    pub max_marks: Option<Decimal>,
}

impl Entity for Assignment {
    type New = NewAssignment;
    const COLLECTION: &'static str = "assignments";

    fn build(id: Id, new: NewAssignment) -> Self {
        Self {
            id,
            teacher_id: new.teacher_id,
            class_id: new.class_id,
            subject_id: new.subject_id,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            max_marks: new.max_marks,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.assignments
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "title", &self.title)?;
        if let Some(max) = &self.max_marks {
            require_non_negative(Self::COLLECTION, "max_marks", max)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentSubmission {
    pub id: Id,
    pub assignment_id: Id,
    pub student_id: Id,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub marks: Option<Decimal>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignmentSubmission {
    pub assignment_id: Id,
    pub student_id: Id,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub marks: Option<Decimal>,
    pub feedback: Option<String>,
}

impl Entity for AssignmentSubmission {
    type New = NewAssignmentSubmission;
    const COLLECTION: &'static str = "assignment_submissions";
    const READONLY_FIELDS: &'static [&'static str] = &["submission_date"];

    fn build(id: Id, new: NewAssignmentSubmission) -> Self {
        Self {
            id,
            assignment_id: new.assignment_id,
            student_id: new.student_id,
            content: new.content,
            file_url: new.file_url,
            submission_date: Utc::now(),
            marks: new.marks,
            feedback: new.feedback,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.assignment_submissions
    }

    fn validate(&self) -> Result<(), StorageError> {
        if let Some(marks) = &self.marks {
            require_non_negative(Self::COLLECTION, "marks", marks)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: Id,
    pub school_id: Id,
    pub class_id: Id,
    pub name: String,
    pub start_date: Day,
    pub end_date: Option<Day>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExam {
    pub school_id: Id,
    pub class_id: Id,
    pub name: String,
    pub start_date: Day,
    pub end_date: Option<Day>,
}

impl Entity for Exam {
    type New = NewExam;
    const COLLECTION: &'static str = "exams";

    fn build(id: Id, new: NewExam) -> Self {
        Self {
            id,
            school_id: new.school_id,
            class_id: new.class_id,
            name: new.name,
            start_date: new.start_date,
            end_date: new.end_date,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.exams
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_text(Self::COLLECTION, "name", &self.name)?;
        match self.end_date {
            Some(end) if end < self.start_date => Err(StorageError::Validation(format!(
                "exam end_date {} is before start_date {}",
                end, self.start_date
            ))),
            _ => Ok(()),
        }
    }
}

/// One paper of an exam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSubject {
    pub id: Id,
    pub exam_id: Id,
    pub subject_id: Id,
    pub exam_date: Option<Day>,
    pub max_marks: Decimal,
    pub passing_marks: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExamSubject {
    pub exam_id: Id,
    pub subject_id: Id,
    pub exam_date: Option<Day>,
    pub max_marks: Decimal,
    pub passing_marks: Option<Decimal>,
}

impl Entity for ExamSubject {
    type New = NewExamSubject;
    const COLLECTION: &'static str = "exam_subjects";

    fn build(id: Id, new: NewExamSubject) -> Self {
        Self {
            id,
            exam_id: new.exam_id,
            subject_id: new.subject_id,
            exam_date: new.exam_date,
            max_marks: new.max_marks,
            passing_marks: new.passing_marks,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.exam_subjects
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_non_negative(Self::COLLECTION, "max_marks", &self.max_marks)?;
        match &self.passing_marks {
            Some(passing) if *passing > self.max_marks => Err(StorageError::Validation(format!(
                "passing_marks {} exceeds max_marks {}",
                passing, self.max_marks
            ))),
            Some(passing) => require_non_negative(Self::COLLECTION, "passing_marks", passing),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mark {
    pub id: Id,
    pub student_id: Id,
    pub exam_subject_id: Id,
    pub marks_obtained: Decimal,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMark {
    pub student_id: Id,
    pub exam_subject_id: Id,
    pub marks_obtained: Decimal,
    pub remarks: Option<String>,
}

impl Entity for Mark {
    type New = NewMark;
    const COLLECTION: &'static str = "marks";

    fn build(id: Id, new: NewMark) -> Self {
        Self {
            id,
            student_id: new.student_id,
            exam_subject_id: new.exam_subject_id,
            marks_obtained: new.marks_obtained,
            remarks: new.remarks,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.marks
    }

    fn validate(&self) -> Result<(), StorageError> {
        require_non_negative(Self::COLLECTION, "marks_obtained", &self.marks_obtained)
    }
}
