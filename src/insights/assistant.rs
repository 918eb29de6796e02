//! Chat Assistants
//!
//! Answers natural-language questions for the chat endpoint. The echo
//! assistant stands in until a generation model is configured.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::AssistantConfig;

/// Produces an answer for a user question
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn answer(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Echoes the prompt back; used when no model is configured
#[derive(Debug, Clone, Default)]
pub struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    fn name(&self) -> &str {
        "echo"
    }

    async fn answer(&self, prompt: &str) -> Result<String, AssistantError> {
        Ok(format!("[assistant stub] Echoing prompt: {}", prompt))
    }
}

/// Calls a JSON text-generation endpoint
///
/// Sends `{"model", "prompt"}` and reads the `text` field of the reply.
pub struct RemoteAssistant {
    client: Client,
    url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

impl RemoteAssistant {
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Assistant for RemoteAssistant {
    fn name(&self) -> &str {
        "remote"
    }

    async fn answer(&self, prompt: &str) -> Result<String, AssistantError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Timeout
                } else if e.is_connect() {
                    AssistantError::Unavailable
                } else {
                    AssistantError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AssistantError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        Ok(reply.text)
    }
}

/// Pick the assistant described by the configuration
///
/// A model without a URL (or the reverse) falls back to the echo assistant.
pub fn assistant_from_config(
    config: &AssistantConfig,
) -> Result<Arc<dyn Assistant>, AssistantError> {
    match (&config.url, &config.model) {
        (Some(url), Some(model)) => {
            tracing::info!(model = %model, url = %url, "Using remote assistant");
            let timeout = Duration::from_secs(config.request_timeout_secs);
            Ok(Arc::new(RemoteAssistant::new(url, model, timeout)?))
        }
        (_, None) => {
            tracing::warn!("No assistant model configured; answers will echo the prompt");
            Ok(Arc::new(EchoAssistant))
        }
        (None, Some(model)) => {
            tracing::warn!(model = %model, "Assistant model set without a URL; answers will echo the prompt");
            Ok(Arc::new(EchoAssistant))
        }
    }
}

/// Errors from an assistant backend
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Assistant unavailable")]
    Unavailable,

    #[error("Assistant request timed out")]
    Timeout,

    #[error("Assistant request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Assistant returned {status}: {message}")]
    ApiError { status: u16, message: String },
}
