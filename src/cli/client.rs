use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Thin JSON client for the School API envelope format
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.request(Method::GET, path, None).await
    }

    /// Send a request and return the response envelope. API errors become `Err`.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> anyhow::Result<Value> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url.clone()).timeout(Duration::from_secs(30));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Request to {} failed: {}", url, e))?;
        let status = response.status();
        let envelope: Value = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Invalid response from {} ({}): {}", url, status, e))?;

        if !status.is_success() || envelope.get("error").and_then(Value::as_bool) == Some(true) {
            let message = envelope.get("message").and_then(Value::as_str).unwrap_or("request failed");
            let code = envelope.get("code").and_then(Value::as_str).unwrap_or("UNKNOWN");
            anyhow::bail!("{} ({}, HTTP {})", message, code, status.as_u16());
        }
        Ok(envelope)
    }
}

/// The `data` member of a success envelope
pub fn envelope_data(envelope: &Value) -> &Value {
    envelope.get("data").unwrap_or(&Value::Null)
}
