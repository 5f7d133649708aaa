// Error types for the recommendations module

use thiserror::Error;

/// The single failure kind of the parameter validator
///
/// Covers unknown enumeration tags, inverted ranges and out-of-range
/// bounds alike; only the message differs. Always a client error, never
/// retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidFilterValue {
    pub message: String,
}

impl InvalidFilterValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors surfaced by `RecommendationService`
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidFilter(#[from] InvalidFilterValue),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures talking to the LLM used for parameter extraction
///
/// These never reach the client; callers fall back to empty parameters.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response contained no choices")]
    EmptyResponse,

    #[error("No JSON object found in LLM response")]
    MissingJson,

    #[error("Failed to parse JSON from LLM response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
