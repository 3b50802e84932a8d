mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::ids;

#[tokio::test]
async fn school_children() -> Result<()> {
    let server = common::demo_server().await?;

    assert_eq!(ids(&server.data("/api/schools/1/classes").await?), vec![1, 2]);
    assert_eq!(ids(&server.data("/api/schools/1/students").await?), vec![1, 2]);
    assert_eq!(ids(&server.data("/api/schools/1/teachers").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/schools/1/school-admins").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/schools/1/subjects").await?), vec![1, 2]);
    assert_eq!(ids(&server.data("/api/schools/1/exams").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/schools/1/fee-structures").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/schools/1/bills").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/schools/1/messages").await?), vec![1, 2]);

    // A school that exists but has nothing yet
    server.post("/api/schools", json!({"name": "Empty Academy"})).await?;
    assert_eq!(ids(&server.data("/api/schools/2/classes").await?), Vec::<i64>::new());

    // A school that does not exist
    assert_eq!(server.get("/api/schools/42/classes").await?.0, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn class_children() -> Result<()> {
    let server = common::demo_server().await?;

    assert_eq!(ids(&server.data("/api/classes/1/students").await?), vec![1, 2]);
    assert_eq!(ids(&server.data("/api/classes/2/students").await?), Vec::<i64>::new());
    assert_eq!(ids(&server.data("/api/classes/1/class-subjects").await?), vec![1, 2]);
    assert_eq!(ids(&server.data("/api/classes/1/lesson-plans").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/classes/1/assignments").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/classes/1/exams").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/classes/1/fee-structures").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/classes/1/class-messages").await?), vec![1]);

    // Moving a student out of the class drops them from the listing
    server.patch("/api/students/2", json!({"class_id": 2})).await?;
    assert_eq!(ids(&server.data("/api/classes/1/students").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/classes/2/students").await?), vec![2]);
    Ok(())
}

#[tokio::test]
async fn attendance_by_day() -> Result<()> {
    let server = common::demo_server().await?;

    let day = server.data("/api/classes/1/attendance?date=2024-09-02").await?;
    assert_eq!(ids(&day), vec![1, 2]);
    assert_eq!(day[1]["status"], "late");

    // Timestamps match on their UTC calendar day
    let stamped = server
        .data("/api/classes/1/attendance?date=2024-09-02T15:30:00Z")
        .await?;
    assert_eq!(ids(&stamped), vec![1, 2]);

    assert_eq!(ids(&server.data("/api/classes/1/attendance?date=2024-09-03").await?), Vec::<i64>::new());
    assert_eq!(ids(&server.data("/api/schools/1/teacher-attendance?date=2024-09-02").await?), vec![1]);

    let (status, body) = server.get("/api/classes/1/attendance").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(server.get("/api/classes/1/attendance?date=yesterday").await?.0, StatusCode::BAD_REQUEST);
    assert_eq!(
        server.get("/api/schools/1/teacher-attendance?date=2024-13-40").await?.0,
        StatusCode::BAD_REQUEST
    );
    Ok(())
}

#[tokio::test]
async fn teacher_and_student_records() -> Result<()> {
    let server = common::demo_server().await?;

    assert_eq!(ids(&server.data("/api/teachers/1/class-subjects").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/teachers/1/attendance").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/teachers/1/lesson-plans").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/teachers/1/assignments").await?), vec![1]);

    assert_eq!(ids(&server.data("/api/students/1/attendance").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/students/1/submissions").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/students/2/marks").await?), vec![2]);
    assert_eq!(ids(&server.data("/api/students/1/fee-payments").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/students/2/fee-payments").await?), Vec::<i64>::new());

    assert_eq!(ids(&server.data("/api/assignments/1/submissions").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/exams/1/exam-subjects").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/exam-subjects/1/marks").await?), vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn user_profiles() -> Result<()> {
    let server = common::demo_server().await?;

    let teacher = server.data("/api/users/3/teacher").await?;
    assert_eq!(teacher["id"], 1);
    assert_eq!(teacher["subject_specialization"], "Mathematics");
    assert_eq!(server.data("/api/users/5/student").await?["full_name"], "Emma Brooks");
    assert_eq!(server.data("/api/users/4/parent").await?["id"], 1);
    assert_eq!(server.data("/api/users/2/school-admin").await?["school_id"], 1);

    // The user exists but has no teacher profile
    let (status, body) = server.get("/api/users/4/teacher").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let user = server.data("/api/users/by-email?email=TEACHER@greenfield.edu").await?;
    assert_eq!(user["id"], 3);
    assert!(user.get("password").is_none());
    assert_eq!(
        server.get("/api/users/by-email?email=nobody@greenfield.edu").await?.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(server.get("/api/users/by-email").await?.0, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn message_inbox_and_outbox() -> Result<()> {
    let server = common::demo_server().await?;

    assert_eq!(ids(&server.data("/api/messages/sent/3").await?), vec![2]);
    assert_eq!(ids(&server.data("/api/messages/sent/5").await?), Vec::<i64>::new());

    // The parent sees the broadcast and the message addressed to them
    assert_eq!(ids(&server.data("/api/messages/inbox/4").await?), vec![1, 2]);
    // Reading as another role keeps only broadcasts
    assert_eq!(ids(&server.data("/api/messages/inbox/4?role=teacher").await?), vec![1]);
    assert_eq!(ids(&server.data("/api/messages/inbox/5").await?), vec![1]);

    assert_eq!(server.get("/api/messages/inbox/4?role=janitor").await?.0, StatusCode::BAD_REQUEST);
    assert_eq!(server.get("/api/messages/inbox/99").await?.0, StatusCode::NOT_FOUND);
    Ok(())
}
