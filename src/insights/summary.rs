//! Summary metrics provider.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::client::Summary;

/// Source of the summary mapping served to the front end
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn summary(&self) -> Summary;
}

/// Fixed set of metrics, typically taken from `[summary.metrics]`
#[derive(Debug, Clone)]
pub struct StaticSummary {
    metrics: Map<String, Value>,
}

impl StaticSummary {
    pub fn new(metrics: Map<String, Value>) -> Self {
        Self { metrics }
    }
}

impl Default for StaticSummary {
    fn default() -> Self {
        Self::new(crate::config::SummaryConfig::default().metrics)
    }
}

#[async_trait]
impl SummaryProvider for StaticSummary {
    async fn summary(&self) -> Summary {
        self.metrics.clone()
    }
}
