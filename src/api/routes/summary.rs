//! Summary Routes
//!
//! - GET /api/insights-summary/ - Key fulfilment metrics

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::client::Summary;

/// GET /api/insights-summary/
///
/// Returns the metrics mapping as a flat JSON object.
pub async fn insights_summary(State(state): State<Arc<AppState>>) -> Json<Summary> {
    let summary = state.summary.summary().await;
    tracing::debug!(keys = summary.len(), "Serving insights summary");
    Json(summary)
}
