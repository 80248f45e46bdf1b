//! Error types and error handling for the application
//!
//! Provider failures are recovered where they happen: the controller swaps in a
//! fixed user-visible message instead of propagating them. Everything else is
//! collected under [`AppError`] for the binaries and the persistence layer.

use thiserror::Error;

/// Errors raised by the AI collaborator
///
/// Payloads are plain strings so the error can travel inside
/// [`crate::controller::Action`] values and be compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No API key was configured
    #[error("API key is empty")]
    MissingApiKey,

    /// The HTTP request could not be sent or the body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with HTTP 429
    #[error("Gemini API rate limit exceeded: {0}")]
    RateLimited(String),

    /// The API answered with a non-success status
    #[error("Gemini API returned error status {code}: {body}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Response body, as returned by the server
        body: String,
    },

    /// The prompt was rejected by the safety filter
    #[error("Gemini API blocked the prompt: {0}")]
    Blocked(String),

    /// The response body could not be decoded
    #[error("Failed to parse JSON response from Gemini API: {0}")]
    InvalidResponse(String),

    /// The response carried no usable text
    #[error("Gemini API response contains no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Errors that can occur while saving or loading the session archive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// File I/O error
    #[error("IO Error: {0}")]
    Io(String),
    /// JSON serialization/deserialization error
    #[error("JSON Error: {0}")]
    Json(String),
    /// Invalid data format
    #[error("Invalid Data: {0}")]
    InvalidData(String),
}

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The AI collaborator failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Session archive could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration value is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Catch-all for unexpected errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
