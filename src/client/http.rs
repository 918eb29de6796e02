//! Insights REST API Client
//!
//! HTTP client for the summary and chat endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::{Summary, FALLBACK_ERROR_MESSAGE};
use crate::config::ClientConfig;

const SUMMARY_PATH: &str = "/api/insights-summary/";
const CHAT_PATH: &str = "/api/chat/";
const SCRAMBLE_ID_HEADER: &str = "X-Scramble-Id";

/// Transport used by the view controller
#[async_trait]
pub trait InsightsBackend: Send + Sync {
    /// GET the summary mapping
    async fn fetch_summary(&self) -> Result<Summary, ClientError>;

    /// POST a query and return the `response` text
    async fn ask(&self, query: &str) -> Result<String, ClientError>;
}

/// reqwest-backed client for the insights API
#[derive(Clone)]
pub struct InsightsClient {
    client: Client,
    base_url: String,
    scramble_id: Option<String>,
}

impl InsightsClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            scramble_id: config.scramble_id.clone(),
        })
    }

    /// Create a client with default settings for the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(&ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InsightsBackend for InsightsClient {
    async fn fetch_summary(&self) -> Result<Summary, ClientError> {
        let response = self
            .client
            .get(self.url(SUMMARY_PATH))
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let response = check_status(response).await?;
        response.json().await.map_err(ClientError::Decode)
    }

    async fn ask(&self, query: &str) -> Result<String, ClientError> {
        let mut request = self
            .client
            .post(self.url(CHAT_PATH))
            .json(&ChatRequest { query });

        if let Some(id) = &self.scramble_id {
            request = request.header(SCRAMBLE_ID_HEADER, id);
        }

        let response = request.send().await.map_err(ClientError::from_transport)?;
        let response = check_status(response).await?;
        let reply: ChatReply = response.json().await.map_err(ClientError::Decode)?;

        Ok(reply.response)
    }
}

/// Turn a non-2xx response into `ClientError::Api`, keeping any `error` text
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty());

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the insights API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Insights API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(reqwest::Error),

    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Api { status: u16, message: Option<String> },
}

impl ClientError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(e)
        }
    }

    /// Text to show the user for a failed chat
    ///
    /// The API's `error` field when the failure carried one, otherwise
    /// [`FALLBACK_ERROR_MESSAGE`].
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message,
            _ => FALLBACK_ERROR_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = InsightsClient::with_base_url("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(CHAT_PATH), "http://localhost:8000/api/chat/");
    }

    #[test]
    fn test_user_message_prefers_api_error() {
        let err = ClientError::Api {
            status: 429,
            message: Some("rate limited".to_string()),
        };
        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ClientError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
        assert_eq!(ClientError::Timeout.user_message(), "An error occurred");
        assert_eq!(ClientError::Unavailable.user_message(), "An error occurred");
    }

    #[test]
    fn test_user_message_empty_error_uses_fallback() {
        let err = ClientError::Api {
            status: 400,
            message: Some(String::new()),
        };
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "bad", "code": "X"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("bad"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": "nope"}"#).unwrap();
        assert!(body.error.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = InsightsClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.fetch_summary().await.unwrap_err();
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }
}
