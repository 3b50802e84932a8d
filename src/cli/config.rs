use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const SERVER_URL_ENV: &str = "SCHOOL_API_URL";

/// Pick the server from `--server`, then `$SCHOOL_API_URL`, then the default
pub fn resolve_server_url(flag: Option<&str>) -> anyhow::Result<Url> {
    let raw = match flag {
        Some(url) => url.to_string(),
        None => std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
    };
    parse_server_url(&raw)
}

pub fn parse_server_url(raw: &str) -> anyhow::Result<Url> {
    // Accept bare host:port
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    let url = Url::parse(&candidate).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow::anyhow!("Unsupported URL scheme '{}'", other)),
    }
}
