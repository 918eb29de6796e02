//! Insight Sources
//!
//! Backends for the two data-bearing API endpoints:
//! - **SummaryProvider**: metrics behind `/api/insights-summary/`
//! - **Assistant**: natural-language answers behind `/api/chat/`

mod assistant;
mod summary;

pub use assistant::{assistant_from_config, Assistant, AssistantError, EchoAssistant, RemoteAssistant};
pub use summary::{StaticSummary, SummaryProvider};
