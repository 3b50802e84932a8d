mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::ids;

#[tokio::test]
async fn find_with_where_order_and_select() -> Result<()> {
    let server = common::demo_server().await?;

    let (status, body) = server
        .post(
            "/api/marks/find",
            json!({
                "where": {"marks_obtained": {"$gte": 70}},
                "order": {"marks_obtained": "asc"},
                "select": ["marks_obtained"]
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(ids(&body["data"]), vec![2, 1]);
    assert_eq!(body["data"][0], json!({"id": 2, "marks_obtained": "72.5"}));
    Ok(())
}

#[tokio::test]
async fn find_logical_and_pattern_operators() -> Result<()> {
    let server = common::demo_server().await?;

    let (_, body) = server
        .post(
            "/api/users/find",
            json!({"where": {"$or": [{"role": "teacher"}, {"email": {"$ilike": "ADMIN@%"}}]}}),
        )
        .await?;
    assert_eq!(ids(&body["data"]), vec![2, 3]);

    let (_, body) = server
        .post("/api/students/find", json!({"where": {"parent_id": {"$null": true}}}))
        .await?;
    assert_eq!(ids(&body["data"]), vec![2]);

    let (_, body) = server
        .post(
            "/api/student-attendance/find",
            json!({"where": {"date": {"$between": ["2024-09-01", "2024-09-30"]}, "$not": {"status": "present"}}}),
        )
        .await?;
    assert_eq!(ids(&body["data"]), vec![2]);
    Ok(())
}

#[tokio::test]
async fn find_never_exposes_passwords() -> Result<()> {
    let server = common::demo_server().await?;

    let (_, body) = server.post("/api/users/find", json!({"select": ["password", "email"]})).await?;
    for row in body["data"].as_array().unwrap() {
        assert!(row.get("password").is_none(), "password leaked: {}", row);
        assert!(row.get("email").is_some());
    }

    // Filtering on the hidden field matches nothing
    let (_, body) = server
        .post("/api/users/find", json!({"where": {"password": {"$exists": true}}}))
        .await?;
    assert_eq!(ids(&body["data"]), Vec::<i64>::new());
    Ok(())
}

#[tokio::test]
async fn malformed_filters_are_400() -> Result<()> {
    let server = common::demo_server().await?;

    for filter in [
        json!({"where": {"id": {"$regex": "1"}}}),
        json!({"where": {"$or": {"id": 1}}}),
        json!({"where": ["id"]}),
        json!({"limit": -5}),
        json!({"offset": -1}),
        json!({"order": "name sideways"}),
        json!({"filter": {}}),
    ] {
        let (status, body) = server.post("/api/schools/find", filter.clone()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} -> {}", filter, body);
        assert_eq!(body["error"], true);
    }
    Ok(())
}

#[tokio::test]
async fn empty_filter_returns_everything() -> Result<()> {
    let server = common::demo_server().await?;
    let (status, body) = server.post("/api/subjects/find", json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]), vec![1, 2]);
    Ok(())
}
