use anyhow::Context;
use std::sync::Arc;

use school_api_rust::config::config;
use school_api_rust::storage::{Fixture, MemStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SCHOOL_API_PORT, STORAGE_FIXTURE_PATH, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "school_api_rust=info,tower_http=info".into()),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting School API in {:?} mode", config.environment);

    let storage = Arc::new(MemStorage::new());
    seed(&storage).await?;

    let app = school_api_rust::app(storage);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("School API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Load the configured fixture, or the demo school when enabled
async fn seed(storage: &MemStorage) -> anyhow::Result<()> {
    let storage_config = &config().storage;

    let fixture = if let Some(path) = &storage_config.fixture_path {
        tracing::info!("Loading fixture {}", path.display());
        Fixture::from_path(path).await?
    } else if storage_config.seed_demo {
        tracing::info!("Seeding demo data");
        Fixture::demo()?
    } else {
        tracing::info!("Starting with empty storage");
        return Ok(());
    };

    fixture.apply(storage).await.context("failed to seed storage")?;
    Ok(())
}
