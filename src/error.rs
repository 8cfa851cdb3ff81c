use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Why a listing extraction failed. Both kinds are terminal for the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ExtractError {
    pub fn parse(message: impl Into<String>) -> Self {
        ExtractError::Parse(message.into())
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for the text-generation service (set LLM_API_KEY)")]
    MissingApiKey,
    #[error("text-generation request failed: {0}")]
    Transport(String),
    #[error("text-generation request timed out after {0:?}")]
    Timeout(Duration),
    #[error("text-generation service returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("malformed text-generation response: {0}")]
    MalformedResponse(String),
}
