mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn root_lists_name_version_and_endpoints() -> Result<()> {
    let server = common::empty_server().await?;

    let data = server.data("/").await?;
    assert_eq!(data["version"], env!("CARGO_PKG_VERSION"));
    assert!(data["name"].as_str().unwrap_or_default().contains("School"));
    assert!(data["endpoints"]["data"].is_string());
    assert_eq!(data["collections"].as_array().map(Vec::len), Some(22));
    Ok(())
}

#[tokio::test]
async fn health_reports_collection_counts() -> Result<()> {
    let server = common::demo_server().await?;

    let data = server.data("/health").await?;
    assert_eq!(data["status"], "ok");
    assert!(data["timestamp"].is_string());
    assert_eq!(data["collections"]["schools"], 1);
    assert_eq!(data["collections"]["students"], 2);
    assert_eq!(data["collections"]["class_messages"], 1);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    let server = common::empty_server().await?;
    let (status, _) = server.get("/api/janitors").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
