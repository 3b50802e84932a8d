use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::entity::Entity;
use super::error::StorageError;
use super::memory::MemStorage;
use crate::models::*;

const DEMO_FIXTURE: &str = include_str!("../../fixtures/demo.yaml");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Fixture row {index} of {collection} rejected: {source}")]
    Rejected {
        collection: &'static str,
        index: usize,
        #[source]
        source: StorageError,
    },
}

/// Seed data keyed by collection name.
///
/// Rows receive ids in file order starting from the table's next id, so in an
/// empty store the first school is 1, the second 2, and so on; references
/// between collections rely on that.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub schools: Vec<NewSchool>,
    #[serde(default)]
    pub users: Vec<NewUser>,
    #[serde(default)]
    pub school_admins: Vec<NewSchoolAdmin>,
    #[serde(default)]
    pub teachers: Vec<NewTeacher>,
    #[serde(default)]
    pub parents: Vec<NewParent>,
    #[serde(default)]
    pub classes: Vec<NewClass>,
    #[serde(default)]
    pub subjects: Vec<NewSubject>,
    #[serde(default)]
    pub students: Vec<NewStudent>,
    #[serde(default)]
    pub class_subjects: Vec<NewClassSubject>,
    #[serde(default)]
    pub student_attendance: Vec<NewStudentAttendance>,
    #[serde(default)]
    pub teacher_attendance: Vec<NewTeacherAttendance>,
    #[serde(default)]
    pub lesson_plans: Vec<NewLessonPlan>,
    #[serde(default)]
    pub assignments: Vec<NewAssignment>,
    #[serde(default)]
    pub assignment_submissions: Vec<NewAssignmentSubmission>,
    #[serde(default)]
    pub exams: Vec<NewExam>,
    #[serde(default)]
    pub exam_subjects: Vec<NewExamSubject>,
    #[serde(default)]
    pub marks: Vec<NewMark>,
    #[serde(default)]
    pub fee_structures: Vec<NewFeeStructure>,
    #[serde(default)]
    pub fee_payments: Vec<NewFeePayment>,
    #[serde(default)]
    pub bills: Vec<NewBill>,
    #[serde(default)]
    pub messages: Vec<NewMessage>,
    #[serde(default)]
    pub class_messages: Vec<NewClassMessage>,
}

impl Fixture {
    pub fn parse(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn demo() -> Result<Self, FixtureError> {
        Self::parse(DEMO_FIXTURE)
    }

    pub async fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let yaml = tokio::fs::read_to_string(path).await.map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&yaml)
    }

    /// Insert every row, parents before children. Returns rows inserted per collection.
    pub async fn apply(self, storage: &MemStorage) -> Result<Vec<(&'static str, usize)>, FixtureError> {
        let mut loaded = Vec::new();
        loaded.push(insert_all::<School>(storage, self.schools).await?);
        let users = self
            .users
            .into_iter()
            .map(|user| NewUser { trusted_hash: true, ..user })
            .collect();
        loaded.push(insert_all::<User>(storage, users).await?);
        loaded.push(insert_all::<SchoolAdmin>(storage, self.school_admins).await?);
        loaded.push(insert_all::<Teacher>(storage, self.teachers).await?);
        loaded.push(insert_all::<Parent>(storage, self.parents).await?);
        loaded.push(insert_all::<Class>(storage, self.classes).await?);
        loaded.push(insert_all::<Subject>(storage, self.subjects).await?);
        loaded.push(insert_all::<Student>(storage, self.students).await?);
        loaded.push(insert_all::<ClassSubject>(storage, self.class_subjects).await?);
        loaded.push(insert_all::<StudentAttendance>(storage, self.student_attendance).await?);
        loaded.push(insert_all::<TeacherAttendance>(storage, self.teacher_attendance).await?);
        loaded.push(insert_all::<LessonPlan>(storage, self.lesson_plans).await?);
        loaded.push(insert_all::<Assignment>(storage, self.assignments).await?);
        loaded.push(insert_all::<AssignmentSubmission>(storage, self.assignment_submissions).await?);
        loaded.push(insert_all::<Exam>(storage, self.exams).await?);
        loaded.push(insert_all::<ExamSubject>(storage, self.exam_subjects).await?);
        loaded.push(insert_all::<Mark>(storage, self.marks).await?);
        loaded.push(insert_all::<FeeStructure>(storage, self.fee_structures).await?);
        loaded.push(insert_all::<FeePayment>(storage, self.fee_payments).await?);
        loaded.push(insert_all::<Bill>(storage, self.bills).await?);
        loaded.push(insert_all::<Message>(storage, self.messages).await?);
        loaded.push(insert_all::<ClassMessage>(storage, self.class_messages).await?);

        loaded.retain(|(_, count)| *count > 0);
        for (collection, count) in &loaded {
            tracing::info!("Fixture loaded {} {}", count, collection);
        }
        Ok(loaded)
    }
}

async fn insert_all<T: Entity>(
    storage: &MemStorage,
    rows: Vec<T::New>,
) -> Result<(&'static str, usize), FixtureError> {
    let count = rows.len();
    let table = storage.table::<T>();
    for (index, row) in rows.into_iter().enumerate() {
        table.create(row).await.map_err(|source| FixtureError::Rejected {
            collection: T::COLLECTION,
            index,
            source,
        })?;
    }
    Ok((T::COLLECTION, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;

    #[tokio::test]
    async fn demo_fixture_loads_with_predictable_ids() {
        let storage = MemStorage::new();
        let loaded = Fixture::demo().unwrap().apply(&storage).await.unwrap();
        assert!(loaded.iter().any(|(c, n)| *c == "schools" && *n >= 1));

        let school = storage.table::<School>().get(1).await.unwrap();
        assert!(!school.name.is_empty());
        assert!(!storage.classes_by_school(1).await.is_empty());
        assert!(!storage.students_by_class(1).await.is_empty());

        // Fixture passwords are stored hashed
        let admin = storage.user_by_email("admin@greenfield.edu").await.unwrap();
        assert!(auth::is_hashed(&admin.password));
        assert!(auth::verify_password("admin123", &admin.password));
    }

    #[tokio::test]
    async fn fixture_keeps_argon2_hashes_verbatim() {
        let stored = auth::hash_password("exported-pass").unwrap();
        let yaml = format!(
            "users:\n  - email: ex@example.com\n    password: '{}'\n    full_name: Ex\n    role: teacher\n",
            stored
        );
        let storage = MemStorage::new();
        Fixture::parse(&yaml).unwrap().apply(&storage).await.unwrap();

        let user = storage.user_by_email("ex@example.com").await.unwrap();
        assert_eq!(user.password, stored);
        assert!(auth::verify_password("exported-pass", &user.password));
    }

    #[test]
    fn unknown_collections_are_rejected() {
        let err = Fixture::parse("janitors:\n  - name: Bob\n").unwrap_err();
        assert!(matches!(err, FixtureError::Parse(_)));
    }

    #[tokio::test]
    async fn rejected_rows_report_collection_and_index() {
        let yaml = r#"
subjects:
  - school_id: 1
    name: Math
  - school_id: 1
    name: "  "
"#;
        let storage = MemStorage::new();
        let err = Fixture::parse(yaml).unwrap().apply(&storage).await.unwrap_err();
        match err {
            FixtureError::Rejected { collection, index, .. } => {
                assert_eq!(collection, "subjects");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
