//! Error types for the AI assistant server

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Main error type for the AI assistant server
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model '{requested}' not available. Available models: {available}")]
    UnknownModel { requested: String, available: String },

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("OpenRouter API error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response from OpenRouter: {0}")]
    InvalidResponse(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssistantError {
    /// Check if error is retryable
    ///
    /// Nothing retries automatically; this only feeds log output so the host
    /// can tell a transient failure from a bad request.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssistantError::Http(e) => e.is_timeout() || e.is_connect(),
            AssistantError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            AssistantError::UnknownTool(_) => -32601,
            AssistantError::InvalidInput(_) => -32602,
            AssistantError::UnknownModel { .. } => -32602,
            _ => -32603,
        }
    }
}
