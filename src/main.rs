use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;

use prompt_catalog::app::{build_fetcher, build_router, AppState};
use prompt_catalog::config::AppConfig;
use prompt_catalog::data::repositories::SqliteKvStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configuration
    let config = AppConfig::from_env();

    // Favorites persistence
    let kv = SqliteKvStore::connect(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    // Catalog data
    let state = AppState::new(&config, build_fetcher(&config), Arc::new(kv));
    if let Err(e) = state.catalog.load().await {
        log::warn!("Initial catalog load failed: {}", e);
    }

    let app = build_router(state, &config.static_dir);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    log::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
