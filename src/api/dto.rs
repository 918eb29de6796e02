//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::Serialize;

/// Ping response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Assistant answer
    pub response: String,
}

/// Liveness details
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub assistant: String,
    pub uptime_seconds: u64,
    pub version: String,
}
