//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ApiConfig, Config};
use crate::insights::{
    assistant_from_config, Assistant, AssistantError, EchoAssistant, StaticSummary,
    SummaryProvider,
};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Source of the summary metrics
    pub summary: Arc<dyn SummaryProvider>,
    /// Answers chat queries
    pub assistant: Arc<dyn Assistant>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState from explicit parts
    pub fn new(
        summary: Arc<dyn SummaryProvider>,
        assistant: Arc<dyn Assistant>,
        config: ApiConfig,
    ) -> Self {
        Self {
            summary,
            assistant,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Build state from the full configuration
    pub fn from_config(config: &Config) -> Result<Self, AssistantError> {
        let summary = Arc::new(StaticSummary::new(config.summary.metrics.clone()));
        let assistant = assistant_from_config(&config.assistant)?;
        Ok(Self::new(summary, assistant, config.api.clone()))
    }

    /// Default metrics and the echo assistant
    pub fn with_defaults(config: ApiConfig) -> Self {
        Self::new(
            Arc::new(StaticSummary::default()),
            Arc::new(EchoAssistant),
            config,
        )
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
