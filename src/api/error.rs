//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::insights::AssistantError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// The chat assistant could not answer
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Message shown to API callers, without the category prefix
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Assistant(e) => e.to_string(),
            ApiError::Io(e) => e.to_string(),
        }
    }
}

/// Error response body
///
/// `error` is a plain string so front ends can display it directly.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub request_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Assistant(AssistantError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "ASSISTANT_TIMEOUT")
            }
            ApiError::Assistant(_) => (StatusCode::BAD_GATEWAY, "ASSISTANT_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: self.message(),
            code: code.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
