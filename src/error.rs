//! Error types for the query-interpretation subsystem

use thiserror::Error;

/// Result type alias for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("LLM call timed out after {0} seconds")]
    LlmTimeout(u64),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
