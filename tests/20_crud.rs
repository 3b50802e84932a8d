mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_assigns_sequential_ids() -> Result<()> {
    let server = common::empty_server().await?;

    let (status, first) = server.post("/api/schools", json!({"name": "North High"})).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", first);
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["id"], 1);
    assert!(first["data"]["created_at"].is_string());

    let (_, second) = server.post("/api/schools", json!({"name": "South High"})).await?;
    assert_eq!(second["data"]["id"], 2);

    // Deleting does not free the id
    server.delete("/api/schools/2").await?;
    let (_, third) = server.post("/api/schools", json!({"name": "East High"})).await?;
    assert_eq!(third["data"]["id"], 3);
    Ok(())
}

#[tokio::test]
async fn get_update_delete_lifecycle() -> Result<()> {
    let server = common::empty_server().await?;
    server
        .post("/api/subjects", json!({"school_id": 1, "name": "Physics", "code": "PHY"}))
        .await?;

    let subject = server.data("/api/subjects/1").await?;
    assert_eq!(subject["name"], "Physics");

    // PATCH merges, untouched fields survive, id cannot change
    let (status, patched) = server
        .patch("/api/subjects/1", json!({"description": "Mechanics and optics", "id": 99}))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", patched);
    assert_eq!(patched["data"]["id"], 1);
    assert_eq!(patched["data"]["code"], "PHY");
    assert_eq!(patched["data"]["description"], "Mechanics and optics");

    // PUT behaves the same way
    let (_, put) = server.put("/api/subjects/1", json!({"name": "Applied Physics"})).await?;
    assert_eq!(put["data"]["name"], "Applied Physics");
    assert_eq!(put["data"]["code"], "PHY");

    let (status, deleted) = server.delete("/api/subjects/1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"]["deleted"], true);

    let (status, missing) = server.get("/api/subjects/1").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], true);
    assert_eq!(missing["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn missing_records_are_404_everywhere() -> Result<()> {
    let server = common::empty_server().await?;
    assert_eq!(server.get("/api/classes/7").await?.0, StatusCode::NOT_FOUND);
    assert_eq!(server.patch("/api/classes/7", json!({"section": "C"})).await?.0, StatusCode::NOT_FOUND);
    assert_eq!(server.delete("/api/classes/7").await?.0, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_input_is_400() -> Result<()> {
    let server = common::empty_server().await?;

    // Missing required field
    let (status, body) = server.post("/api/classes", json!({"school_id": 1})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Rule violation
    let (status, _) = server
        .post("/api/classes", json!({"school_id": 1, "grade": "", "section": "A"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-integer id
    assert_eq!(server.get("/api/classes/abc").await?.0, StatusCode::BAD_REQUEST);

    // Patch body must be an object
    server
        .post("/api/classes", json!({"school_id": 1, "grade": "5", "section": "A"}))
        .await?;
    let (status, body) = server.patch("/api/classes/1", json!(["grade"])).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    // Ill-typed patch leaves the record unchanged
    let (status, _) = server.patch("/api/classes/1", json!({"school_id": "one"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.data("/api/classes/1").await?["school_id"], 1);
    Ok(())
}

#[tokio::test]
async fn list_supports_order_limit_offset() -> Result<()> {
    let server = common::empty_server().await?;
    for name in ["Mathematics", "Art", "Science", "History"] {
        server.post("/api/subjects", json!({"school_id": 1, "name": name})).await?;
    }

    let all = server.data("/api/subjects").await?;
    assert_eq!(common::ids(&all), vec![1, 2, 3, 4]);

    let page = server.data("/api/subjects?order=name%20asc&limit=2&offset=1").await?;
    let names: Vec<_> = page.as_array().unwrap().iter().map(|r| r["name"].clone()).collect();
    assert_eq!(names, vec![json!("History"), json!("Mathematics")]);

    let (status, _) = server.get("/api/subjects?limit=-1").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn decimal_amounts_accept_numbers_and_strings() -> Result<()> {
    let server = common::empty_server().await?;

    let (status, body) = server
        .post(
            "/api/fee-structures",
            json!({"school_id": 1, "class_id": 1, "name": "Tuition", "amount": 1200.5, "frequency": "monthly"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let amount: f64 = body["data"]["amount"].as_str().unwrap_or_default().parse()?;
    assert_eq!(amount, 1200.5);

    let (status, _) = server
        .post(
            "/api/fee-structures",
            json!({"school_id": 1, "class_id": 1, "name": "Bus", "amount": "-3", "frequency": "monthly"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn fee_payments_get_receipt_numbers() -> Result<()> {
    let server = common::empty_server().await?;
    let (status, body) = server
        .post(
            "/api/fee-payments",
            json!({"student_id": 1, "fee_structure_id": 1, "amount": "300", "payment_method": "cash"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["data"]["receipt_number"].as_str().unwrap_or_default().starts_with("RCPT-"));
    assert_eq!(body["data"]["status"], "paid");
    Ok(())
}

#[tokio::test]
async fn storage_assigned_fields_survive_patches() -> Result<()> {
    let server = common::demo_server().await?;

    let school = server.data("/api/schools/1").await?;
    let (status, patched) = server
        .patch("/api/schools/1", json!({"created_at": "2001-01-01T00:00:00Z", "phone": "555-0100"}))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", patched);
    assert_eq!(patched["data"]["created_at"], school["created_at"]);
    assert_eq!(patched["data"]["phone"], "555-0100");

    let payment = server.data("/api/fee-payments/1").await?;
    let (status, patched) = server
        .patch("/api/fee-payments/1", json!({"receipt_number": "FORGED-1"}))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", patched);
    assert_eq!(patched["data"]["receipt_number"], payment["receipt_number"]);

    let submission = server.data("/api/assignment-submissions/1").await?;
    let (status, patched) = server
        .patch("/api/assignment-submissions/1", json!({"submission_date": "2001-01-01T00:00:00Z"}))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", patched);
    assert_eq!(patched["data"]["submission_date"], submission["submission_date"]);

    // Still unchanged on a fresh read
    let school_after = server.data("/api/schools/1").await?;
    assert_eq!(school_after["created_at"], school["created_at"]);
    Ok(())
}

#[tokio::test]
async fn deleting_a_school_leaves_its_children() -> Result<()> {
    let server = common::demo_server().await?;
    let before = common::ids(&server.data("/api/classes").await?);
    assert!(!before.is_empty());

    let (status, _) = server.delete("/api/schools/1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.get("/api/schools/1").await?.0, StatusCode::NOT_FOUND);

    let classes = server.data("/api/classes").await?;
    assert_eq!(common::ids(&classes), before);
    assert!(classes.as_array().unwrap().iter().all(|c| c["school_id"] == 1));
    assert!(!server.storage.classes_by_school(1).await.is_empty());
    Ok(())
}
