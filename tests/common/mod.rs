#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use school_api_rust::storage::{Fixture, MemStorage};

/// A router served in-process on a free port, with its own storage
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub storage: Arc<MemStorage>,
    client: reqwest::Client,
}

impl TestServer {
    async fn spawn(storage: Arc<MemStorage>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let app = school_api_rust::app(storage.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, storage, client: reqwest::Client::new() };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            if let Ok(resp) = self.client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        let status = res.status();
        let payload = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, payload))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, None).await
    }

    /// `data` of a success envelope, failing on anything else
    pub async fn data(&self, path: &str) -> Result<Value> {
        let (status, body) = self.get(path).await?;
        anyhow::ensure!(status == StatusCode::OK, "GET {} returned {}: {}", path, status, body);
        anyhow::ensure!(body["success"] == Value::Bool(true), "success flag missing: {}", body);
        Ok(body["data"].clone())
    }
}

/// Server over empty storage
pub async fn empty_server() -> Result<TestServer> {
    TestServer::spawn(Arc::new(MemStorage::new())).await
}

/// Server seeded with the bundled demo school
pub async fn demo_server() -> Result<TestServer> {
    let storage = Arc::new(MemStorage::new());
    Fixture::demo()?.apply(&storage).await?;
    TestServer::spawn(storage).await
}

pub fn ids(data: &Value) -> Vec<i64> {
    data.as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default()
}
