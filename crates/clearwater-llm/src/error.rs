//! Error types for the model gateway client

use thiserror::Error;

/// Result alias used throughout the client
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors raised while talking to the hosted model gateway
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connect, TLS, timeout inside the HTTP client)
    #[cfg(feature = "http")]
    #[error("HTTP request to model gateway failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("model gateway returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body or reason phrase
        message: String,
    },

    /// The gateway answered 2xx but the body was not what the protocol promises
    #[error("invalid response from model gateway: {0}")]
    InvalidResponse(String),

    /// Client configuration could not be loaded or is incomplete
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LlmError {
    /// Create an API error from a status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

impl From<::config::ConfigError> for LlmError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
