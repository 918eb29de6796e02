//! Insights API Server
//!
//! Run with: cargo run --bin insights-api
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (see `insights-cli config`).
//! Environment variables:
//! - `INSIGHTS_CONFIG`: Explicit config file path
//! - `INSIGHTS_API_HOST` / `INSIGHTS_API_PORT`: Bind address (default: 0.0.0.0:8000)
//! - `INSIGHTS_ASSISTANT_URL` / `INSIGHTS_ASSISTANT_MODEL`: Generation endpoint
//! - `INSIGHTS_LOG_LEVEL` / `INSIGHTS_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter override

use anyhow::Context;
use insights_hub::api::{serve, AppState};
use insights_hub::config::Config;
use insights_hub::logging::init_logging;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("INSIGHTS_CONFIG").ok().map(PathBuf::from);
    let (config, source) = Config::resolve(config_path.as_deref())?;

    init_logging(&config.logging, "insights_api=info,tower_http=debug");
    source.log();

    tracing::info!("Starting Insights API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Serving {} summary metrics", config.summary.metrics.len());

    let state = AppState::from_config(&config).context("failed to set up chat assistant")?;

    serve(state, &config.api).await?;

    tracing::info!("Insights API server stopped");
    Ok(())
}
