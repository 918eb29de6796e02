//! # Insights Hub
//!
//! Fulfilment Insights Hub - key metrics and a natural-language chat over a
//! small JSON API.
//!
//! ## Modules
//!
//! - [`client`]: HTTP client and the view controller front ends render
//! - [`api`]: REST API server with Axum
//! - [`insights`]: Summary metrics and chat assistants behind the API
//! - [`format`]: Display helpers for metric keys
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use insights_hub::client::{InsightsClient, ViewController};
//! use insights_hub::format::format_key;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = InsightsClient::with_base_url("http://localhost:8000")?;
//!     let (controller, summary_load) = ViewController::initialize(Arc::new(client));
//!     summary_load.await?;
//!
//!     for (key, value) in controller.summary() {
//!         println!("{}: {}", format_key(&key), value);
//!     }
//!
//!     controller.set_query("How many orders shipped late yesterday?");
//!     if let Some(reply) = controller.send_query() {
//!         reply.await?;
//!     }
//!
//!     for exchange in controller.history() {
//!         println!("> {}\n{}", exchange.query, exchange.answer);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod format;
pub mod insights;
pub mod logging;

pub use api::{build_router, serve, ApiError, AppState};

pub use client::{
    ClientError, Exchange, InsightsBackend, InsightsClient, Summary, ViewController, ViewEvent,
    FALLBACK_ERROR_MESSAGE,
};

pub use config::{
    ApiConfig, AssistantConfig, ClientConfig, Config, ConfigError, ConfigSource, LoggingConfig,
    SummaryConfig,
};

pub use format::format_key;

pub use insights::{Assistant, AssistantError, EchoAssistant, RemoteAssistant, StaticSummary, SummaryProvider};
