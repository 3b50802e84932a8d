use super::entity::Entity;
use super::repository::Repository;
use super::table::MemTable;
use crate::models::*;

/// The storage facade: one in-memory table per entity kind.
///
/// Nothing is persisted; the whole store lives as long as the process. Every
/// lookup below is a linear scan over one table, mirroring the foreign key it
/// is named after. There is no referential integrity: deleting a school leaves
/// its classes in place.
#[derive(Default)]
pub struct MemStorage {
    pub(crate) users: MemTable<User>,
    pub(crate) schools: MemTable<School>,
    pub(crate) school_admins: MemTable<SchoolAdmin>,
    pub(crate) teachers: MemTable<Teacher>,
    pub(crate) parents: MemTable<Parent>,
    pub(crate) students: MemTable<Student>,
    pub(crate) classes: MemTable<Class>,
    pub(crate) subjects: MemTable<Subject>,
    pub(crate) class_subjects: MemTable<ClassSubject>,
    pub(crate) student_attendance: MemTable<StudentAttendance>,
    pub(crate) teacher_attendance: MemTable<TeacherAttendance>,
    pub(crate) lesson_plans: MemTable<LessonPlan>,
    pub(crate) assignments: MemTable<Assignment>,
    pub(crate) assignment_submissions: MemTable<AssignmentSubmission>,
    pub(crate) exams: MemTable<Exam>,
    pub(crate) exam_subjects: MemTable<ExamSubject>,
    pub(crate) marks: MemTable<Mark>,
    pub(crate) fee_structures: MemTable<FeeStructure>,
    pub(crate) fee_payments: MemTable<FeePayment>,
    pub(crate) bills: MemTable<Bill>,
    pub(crate) messages: MemTable<Message>,
    pub(crate) class_messages: MemTable<ClassMessage>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table holding `T`
    pub fn table<T: Entity>(&self) -> &MemTable<T> {
        T::table(self)
    }

    pub fn repo<T: Entity>(&self) -> &dyn Repository<T> {
        T::table(self)
    }

    /// Record counts per collection, in declaration order
    pub async fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (User::COLLECTION, self.users.count().await),
            (School::COLLECTION, self.schools.count().await),
            (SchoolAdmin::COLLECTION, self.school_admins.count().await),
            (Teacher::COLLECTION, self.teachers.count().await),
            (Parent::COLLECTION, self.parents.count().await),
            (Student::COLLECTION, self.students.count().await),
            (Class::COLLECTION, self.classes.count().await),
            (Subject::COLLECTION, self.subjects.count().await),
            (ClassSubject::COLLECTION, self.class_subjects.count().await),
            (StudentAttendance::COLLECTION, self.student_attendance.count().await),
            (TeacherAttendance::COLLECTION, self.teacher_attendance.count().await),
            (LessonPlan::COLLECTION, self.lesson_plans.count().await),
            (Assignment::COLLECTION, self.assignments.count().await),
            (AssignmentSubmission::COLLECTION, self.assignment_submissions.count().await),
            (Exam::COLLECTION, self.exams.count().await),
            (ExamSubject::COLLECTION, self.exam_subjects.count().await),
            (Mark::COLLECTION, self.marks.count().await),
            (FeeStructure::COLLECTION, self.fee_structures.count().await),
            (FeePayment::COLLECTION, self.fee_payments.count().await),
            (Bill::COLLECTION, self.bills.count().await),
            (Message::COLLECTION, self.messages.count().await),
            (ClassMessage::COLLECTION, self.class_messages.count().await),
        ]
    }

    // Users

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.find_one(|u| u.email.eq_ignore_ascii_case(email)).await
    }

    /// Usernames are email addresses
    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        self.user_by_email(username).await
    }

    // Schools

    pub async fn schools(&self) -> Vec<School> {
        self.schools.list().await
    }

    pub async fn school_admin_by_user(&self, user_id: Id) -> Option<SchoolAdmin> {
        self.school_admins.find_one(|a| a.user_id == user_id).await
    }

    pub async fn school_admins_by_school(&self, school_id: Id) -> Vec<SchoolAdmin> {
        self.school_admins.filter(|a| a.school_id == school_id).await
    }

    // People

    pub async fn teacher_by_user(&self, user_id: Id) -> Option<Teacher> {
        self.teachers.find_one(|t| t.user_id == user_id).await
    }

    pub async fn teachers_by_school(&self, school_id: Id) -> Vec<Teacher> {
        self.teachers.filter(|t| t.school_id == school_id).await
    }

    pub async fn parent_by_user(&self, user_id: Id) -> Option<Parent> {
        self.parents.find_one(|p| p.user_id == user_id).await
    }

    pub async fn student_by_user(&self, user_id: Id) -> Option<Student> {
        self.students.find_one(|s| s.user_id == user_id).await
    }

    pub async fn students_by_school(&self, school_id: Id) -> Vec<Student> {
        self.students.filter(|s| s.school_id == school_id).await
    }

    pub async fn students_by_class(&self, class_id: Id) -> Vec<Student> {
        self.students.filter(|s| s.class_id == Some(class_id)).await
    }

    // Classes and subjects

    pub async fn classes_by_school(&self, school_id: Id) -> Vec<Class> {
        self.classes.filter(|c| c.school_id == school_id).await
    }

    pub async fn subjects_by_school(&self, school_id: Id) -> Vec<Subject> {
        self.subjects.filter(|s| s.school_id == school_id).await
    }

    pub async fn class_subjects_by_class(&self, class_id: Id) -> Vec<ClassSubject> {
        self.class_subjects.filter(|cs| cs.class_id == class_id).await
    }

    pub async fn class_subjects_by_teacher(&self, teacher_id: Id) -> Vec<ClassSubject> {
        self.class_subjects.filter(|cs| cs.teacher_id == Some(teacher_id)).await
    }

    // Attendance

    pub async fn student_attendance_by_student(&self, student_id: Id) -> Vec<StudentAttendance> {
        self.student_attendance.filter(|a| a.student_id == student_id).await
    }

    /// Attendance for one class on one calendar day
    pub async fn student_attendance_by_class(&self, class_id: Id, date: Day) -> Vec<StudentAttendance> {
        self.student_attendance
            .filter(|a| a.class_id == class_id && a.date == date)
            .await
    }

    pub async fn teacher_attendance_by_teacher(&self, teacher_id: Id) -> Vec<TeacherAttendance> {
        self.teacher_attendance.filter(|a| a.teacher_id == teacher_id).await
    }

    pub async fn teacher_attendance_by_school(&self, school_id: Id, date: Day) -> Vec<TeacherAttendance> {
        self.teacher_attendance
            .filter(|a| a.school_id == school_id && a.date == date)
            .await
    }

    // Coursework

    pub async fn lesson_plans_by_teacher(&self, teacher_id: Id) -> Vec<LessonPlan> {
        self.lesson_plans.filter(|lp| lp.teacher_id == teacher_id).await
    }

    pub async fn lesson_plans_by_class(&self, class_id: Id) -> Vec<LessonPlan> {
        self.lesson_plans.filter(|lp| lp.class_id == class_id).await
    }

    pub async fn assignments_by_teacher(&self, teacher_id: Id) -> Vec<Assignment> {
        self.assignments.filter(|a| a.teacher_id == teacher_id).await
    }

    pub async fn assignments_by_class(&self, class_id: Id) -> Vec<Assignment> {
        self.assignments.filter(|a| a.class_id == class_id).await
    }

    pub async fn submissions_by_assignment(&self, assignment_id: Id) -> Vec<AssignmentSubmission> {
        self.assignment_submissions
            .filter(|s| s.assignment_id == assignment_id)
            .await
    }

    pub async fn submissions_by_student(&self, student_id: Id) -> Vec<AssignmentSubmission> {
        self.assignment_submissions.filter(|s| s.student_id == student_id).await
    }

    // Exams

    pub async fn exams_by_school(&self, school_id: Id) -> Vec<Exam> {
        self.exams.filter(|e| e.school_id == school_id).await
    }

    pub async fn exams_by_class(&self, class_id: Id) -> Vec<Exam> {
        self.exams.filter(|e| e.class_id == class_id).await
    }

    pub async fn exam_subjects_by_exam(&self, exam_id: Id) -> Vec<ExamSubject> {
        self.exam_subjects.filter(|es| es.exam_id == exam_id).await
    }

    pub async fn marks_by_student(&self, student_id: Id) -> Vec<Mark> {
        self.marks.filter(|m| m.student_id == student_id).await
    }

    pub async fn marks_by_exam_subject(&self, exam_subject_id: Id) -> Vec<Mark> {
        self.marks.filter(|m| m.exam_subject_id == exam_subject_id).await
    }

    // Fees and bills

    pub async fn fee_structures_by_school(&self, school_id: Id) -> Vec<FeeStructure> {
        self.fee_structures.filter(|fs| fs.school_id == school_id).await
    }

    pub async fn fee_structures_by_class(&self, class_id: Id) -> Vec<FeeStructure> {
        self.fee_structures.filter(|fs| fs.class_id == class_id).await
    }

    pub async fn fee_payments_by_student(&self, student_id: Id) -> Vec<FeePayment> {
        self.fee_payments.filter(|fp| fp.student_id == student_id).await
    }

    pub async fn bills_by_school(&self, school_id: Id) -> Vec<Bill> {
        self.bills.filter(|b| b.school_id == school_id).await
    }

    // Messaging

    pub async fn messages_by_sender(&self, sender_id: Id) -> Vec<Message> {
        self.messages.filter(|m| m.sender_id == sender_id).await
    }

    pub async fn messages_by_school(&self, school_id: Id) -> Vec<Message> {
        self.messages.filter(|m| m.school_id == school_id).await
    }

    /// Messages addressed to this exact (receiver, role) pair, plus every broadcast
    pub async fn messages_for_receiver(&self, receiver_id: Id, role: Role) -> Vec<Message> {
        let audience = Audience::from(role);
        self.messages
            .filter(|m| {
                (m.receiver_id == Some(receiver_id) && m.receiver_role == audience)
                    || m.receiver_role == Audience::All
            })
            .await
    }

    pub async fn class_messages_by_class(&self, class_id: Id) -> Vec<ClassMessage> {
        self.class_messages.filter(|cm| cm.class_id == class_id).await
    }
}
