//! Insights Front End
//!
//! Client side of the Insights Hub: an HTTP client for the two API
//! endpoints and the view controller that holds what a front end renders.
//!
//! ## Architecture
//!
//! - **InsightsBackend**: the transport seam the controller calls
//! - **InsightsClient**: reqwest implementation of the backend
//! - **ViewController**: summary, input text and conversation history
//!
//! ## Data Flow
//!
//! 1. `ViewController::initialize` starts loading the summary
//! 2. Each `send_query` clears the input and posts the captured text
//! 3. Completed or failed chats are appended to the history, in
//!    completion order, and announced as `ViewEvent`s

mod controller;
mod http;

pub use controller::{ViewController, ViewEvent};
pub use http::{ClientError, InsightsBackend, InsightsClient};

/// Opaque backend-provided metrics, displayed as-is
pub type Summary = serde_json::Map<String, serde_json::Value>;

/// Answer recorded when a failed chat carries no `error` message
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// One query and the answer (or error message) it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub query: String,
    pub answer: String,
}

impl Exchange {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
        }
    }
}
