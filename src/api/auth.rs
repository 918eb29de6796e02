//! Caller Identity
//!
//! Requests may carry an `X-Scramble-Id` header naming the caller. The id
//! is taken at face value; validating it against the identity service is
//! left to a fronting gateway.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

pub const SCRAMBLE_ID_HEADER: &str = "x-scramble-id";

/// Identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    ScrambleId(String),
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::ScrambleId(_))
    }

    /// Label for logs
    pub fn label(&self) -> &str {
        match self {
            Caller::Anonymous => "anonymous",
            Caller::ScrambleId(id) => id,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(SCRAMBLE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Caller::ScrambleId(id.to_string()))
            .unwrap_or(Caller::Anonymous);

        Ok(caller)
    }
}
