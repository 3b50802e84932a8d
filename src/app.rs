//! Router assembly. Shared by the server binary and the integration tests.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::config;
use crate::handlers::{data, public, relations};
use crate::models::*;
use crate::storage::{Entity, MemStorage};

type AppRouter = Router<Arc<MemStorage>>;

/// URL segment of every collection exposed under `/api`
pub const COLLECTIONS: &[&str] = &[
    "users",
    "schools",
    "school-admins",
    "teachers",
    "parents",
    "students",
    "classes",
    "subjects",
    "class-subjects",
    "student-attendance",
    "teacher-attendance",
    "lesson-plans",
    "assignments",
    "assignment-submissions",
    "exams",
    "exam-subjects",
    "marks",
    "fee-structures",
    "fee-payments",
    "bills",
    "messages",
    "class-messages",
];

pub fn app(storage: Arc<MemStorage>) -> Router {
    let config = config();

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(account_routes())
        // Lookups first so their static segments sit beside the :id routes
        .merge(school_routes())
        .merge(class_routes())
        .merge(people_routes())
        .merge(academic_routes())
        .merge(message_routes())
        .merge(data_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(storage)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE];
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(allowed).allow_methods(methods).allow_headers(Any)
}

fn account_routes() -> AppRouter {
    use public::auth;

    Router::new()
        .route("/api/register", post(auth::register_post))
        .route("/api/login", post(auth::login_post))
}

/// List/create, find, and record-level routes for one entity kind
fn collection<T: Entity>(segment: &str) -> AppRouter {
    Router::new()
        // Collection-level operations
        .route(
            &format!("/api/{}", segment),
            get(data::schema_get::<T>).post(data::schema_post::<T>),
        )
        .route(&format!("/api/{}/find", segment), post(data::find_post::<T>))
        // Record-level operations
        .route(
            &format!("/api/{}/:id", segment),
            get(data::record_get::<T>)
                .put(data::record_put::<T>)
                .patch(data::record_patch::<T>)
                .delete(data::record_delete::<T>),
        )
}

fn data_routes() -> AppRouter {
    Router::new()
        .merge(collection::<User>("users"))
        .merge(collection::<School>("schools"))
        .merge(collection::<SchoolAdmin>("school-admins"))
        .merge(collection::<Teacher>("teachers"))
        .merge(collection::<Parent>("parents"))
        .merge(collection::<Student>("students"))
        .merge(collection::<Class>("classes"))
        .merge(collection::<Subject>("subjects"))
        .merge(collection::<ClassSubject>("class-subjects"))
        .merge(collection::<StudentAttendance>("student-attendance"))
        .merge(collection::<TeacherAttendance>("teacher-attendance"))
        .merge(collection::<LessonPlan>("lesson-plans"))
        .merge(collection::<Assignment>("assignments"))
        .merge(collection::<AssignmentSubmission>("assignment-submissions"))
        .merge(collection::<Exam>("exams"))
        .merge(collection::<ExamSubject>("exam-subjects"))
        .merge(collection::<Mark>("marks"))
        .merge(collection::<FeeStructure>("fee-structures"))
        .merge(collection::<FeePayment>("fee-payments"))
        .merge(collection::<Bill>("bills"))
        .merge(collection::<Message>("messages"))
        .merge(collection::<ClassMessage>("class-messages"))
}

fn school_routes() -> AppRouter {
    use relations::schools;

    Router::new()
        .route("/api/schools/:id/school-admins", get(schools::school_admins))
        .route("/api/schools/:id/teachers", get(schools::teachers))
        .route("/api/schools/:id/students", get(schools::students))
        .route("/api/schools/:id/classes", get(schools::classes))
        .route("/api/schools/:id/subjects", get(schools::subjects))
        .route("/api/schools/:id/exams", get(schools::exams))
        .route("/api/schools/:id/fee-structures", get(schools::fee_structures))
        .route("/api/schools/:id/bills", get(schools::bills))
        .route("/api/schools/:id/messages", get(schools::messages))
        .route("/api/schools/:id/teacher-attendance", get(schools::teacher_attendance))
}

fn class_routes() -> AppRouter {
    use relations::classes;

    Router::new()
        .route("/api/classes/:id/students", get(classes::students))
        .route("/api/classes/:id/class-subjects", get(classes::class_subjects))
        .route("/api/classes/:id/lesson-plans", get(classes::lesson_plans))
        .route("/api/classes/:id/assignments", get(classes::assignments))
        .route("/api/classes/:id/exams", get(classes::exams))
        .route("/api/classes/:id/fee-structures", get(classes::fee_structures))
        .route("/api/classes/:id/class-messages", get(classes::class_messages))
        .route("/api/classes/:id/attendance", get(classes::attendance))
}

fn people_routes() -> AppRouter {
    use relations::people;

    Router::new()
        // Teachers
        .route("/api/teachers/:id/class-subjects", get(people::teacher_class_subjects))
        .route("/api/teachers/:id/attendance", get(people::teacher_attendance))
        .route("/api/teachers/:id/lesson-plans", get(people::teacher_lesson_plans))
        .route("/api/teachers/:id/assignments", get(people::teacher_assignments))
        // Students
        .route("/api/students/:id/attendance", get(people::student_attendance))
        .route("/api/students/:id/submissions", get(people::student_submissions))
        .route("/api/students/:id/marks", get(people::student_marks))
        .route("/api/students/:id/fee-payments", get(people::student_fee_payments))
        // Users
        .route("/api/users/by-email", get(people::user_by_email))
        .route("/api/users/:id/teacher", get(people::user_teacher))
        .route("/api/users/:id/student", get(people::user_student))
        .route("/api/users/:id/parent", get(people::user_parent))
        .route("/api/users/:id/school-admin", get(people::user_school_admin))
}

fn academic_routes() -> AppRouter {
    use relations::academics;

    Router::new()
        .route("/api/assignments/:id/submissions", get(academics::assignment_submissions))
        .route("/api/exams/:id/exam-subjects", get(academics::exam_subjects))
        .route("/api/exam-subjects/:id/marks", get(academics::exam_subject_marks))
}

fn message_routes() -> AppRouter {
    use relations::messages;

    Router::new()
        .route("/api/messages/sent/:id", get(messages::sent))
        .route("/api/messages/inbox/:id", get(messages::inbox))
}
