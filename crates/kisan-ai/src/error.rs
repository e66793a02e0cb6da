//! Error types for the AI module

use thiserror::Error;

/// AI module error types
#[derive(Error, Debug)]
pub enum AiError {
    /// Upstream answered 429.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Upstream answered 402.
    #[error("AI credits exhausted. Please add credits.")]
    QuotaExhausted,

    #[error("Upstream error ({status}): {message}")]
    UpstreamHttp { status: u16, message: String },

    #[error("Upstream API key is not configured")]
    MissingApiKey,

    /// The proxy refused the request; `message` is its `error` field.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to connect to assistant: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AiError {
    /// Whether the user may retry later without changing anything.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::RateLimited => true,
            AiError::Rejected { status, .. } => *status == 429,
            AiError::Connection(_) => true,
            AiError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Result type alias for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
