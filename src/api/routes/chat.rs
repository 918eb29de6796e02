//! Chat Routes
//!
//! - POST /api/chat/ - Ask the assistant a question

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::auth::Caller;
use crate::api::dto::ChatResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

const MISSING_QUERY: &str = "Missing \"query\" in request body";

/// POST /api/chat/
///
/// Body must be a JSON object with a `query` key. Non-string queries are
/// stringified before being passed on, with `null` and booleans spelled
/// `None`, `True` and `False`.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(body) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let query = extract_query(&body)?;

    tracing::info!(
        caller = %caller.label(),
        authenticated = caller.is_authenticated(),
        assistant = %state.assistant.name(),
        query_len = query.len(),
        "Chat query received"
    );

    let response = state.assistant.answer(&query).await?;
    Ok(Json(ChatResponse { response }))
}

fn extract_query(body: &Value) -> ApiResult<String> {
    let query = body
        .as_object()
        .and_then(|obj| obj.get("query"))
        .ok_or_else(|| ApiError::Validation(MISSING_QUERY.to_string()))?;

    Ok(match query {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_string_query() {
        assert_eq!(extract_query(&json!({"query": "orders?"})).unwrap(), "orders?");
    }

    #[test]
    fn test_extract_non_string_query() {
        assert_eq!(extract_query(&json!({"query": 42})).unwrap(), "42");
        assert_eq!(extract_query(&json!({"query": null})).unwrap(), "None");
        assert_eq!(extract_query(&json!({"query": true})).unwrap(), "True");
        assert_eq!(extract_query(&json!({"query": false})).unwrap(), "False");
        assert_eq!(extract_query(&json!({"query": [1, 2]})).unwrap(), "[1,2]");
    }

    #[test]
    fn test_missing_query() {
        let err = extract_query(&json!({"question": "orders?"})).unwrap_err();
        assert_eq!(err.message(), MISSING_QUERY);
    }

    #[test]
    fn test_non_object_body() {
        assert!(extract_query(&json!(["query"])).is_err());
        assert!(extract_query(&json!("query")).is_err());
    }
}
