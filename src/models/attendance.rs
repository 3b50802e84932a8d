use serde::{Deserialize, Serialize};

use super::common::{AttendanceStatus, Day, Id};
use crate::storage::entity::Entity;
use crate::storage::{MemStorage, MemTable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAttendance {
    pub id: Id,
    pub student_id: Id,
    pub class_id: Id,
    pub date: Day,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudentAttendance {
    pub student_id: Id,
    pub class_id: Id,
    pub date: Day,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

impl Entity for StudentAttendance {
    type New = NewStudentAttendance;
    const COLLECTION: &'static str = "student_attendance";

    fn build(id: Id, new: NewStudentAttendance) -> Self {
        Self {
            id,
            student_id: new.student_id,
            class_id: new.class_id,
            date: new.date,
            status: new.status,
            remarks: new.remarks,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.student_attendance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAttendance {
    pub id: Id,
    pub teacher_id: Id,
    pub school_id: Id,
    pub date: Day,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeacherAttendance {
    pub teacher_id: Id,
    pub school_id: Id,
    pub date: Day,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

impl Entity for TeacherAttendance {
    type New = NewTeacherAttendance;
    const COLLECTION: &'static str = "teacher_attendance";

    fn build(id: Id, new: NewTeacherAttendance) -> Self {
        Self {
            id,
            teacher_id: new.teacher_id,
            school_id: new.school_id,
            date: new.date,
            status: new.status,
            remarks: new.remarks,
        }
    }

    fn table(storage: &MemStorage) -> &MemTable<Self> {
        &storage.teacher_attendance
    }
}
