//! Error types for the agent core and data accessors

use clearwater_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

/// Result alias used across the crate
pub type RagResult<T> = Result<T, RagError>;

/// Errors raised by the agent core
#[derive(Debug, Error)]
pub enum RagError {
    /// Malformed input rejected at the boundary
    #[error("invalid `{field}`: {constraint} (got {value})")]
    Validation {
        field: String,
        constraint: String,
        value: String,
    },

    /// Agent construction failed; nothing was cached for the session
    #[error("failed to initialize agent for session `{session_id}`: {source}")]
    Registry {
        session_id: String,
        #[source]
        source: Box<RagError>,
    },

    /// Embedding or recall backend failure
    #[error("memory backend error during {operation}: {message}")]
    MemoryBackend { operation: String, message: String },

    /// The hosted model call failed
    #[error("model call failed: {0}")]
    Vendor(#[from] LlmError),

    /// A boundary call exceeded its deadline
    #[error("{operation} timed out after {timeout:?}")]
    Timeout { operation: String, timeout: Duration },

    /// Requested resource does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Filesystem failure
    #[error("storage error during {operation}: {source}")]
    Storage {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Object storage failure other than a missing object
    #[error("object store error for `{path}`: {message}")]
    ObjectStore { path: String, message: String },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl RagError {
    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
        }
    }

    /// Wrap an agent construction failure
    pub fn registry(session_id: impl Into<String>, source: RagError) -> Self {
        Self::Registry {
            session_id: session_id.into(),
            source: Box::new(source),
        }
    }

    /// Create a memory backend error
    pub fn memory_backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MemoryBackend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout,
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a storage error
    pub fn storage(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.into(),
            source,
        }
    }

    /// Create an object store error
    pub fn object_store(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ObjectStore {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the caller sent bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }

    /// Whether the failure came from the hosted model boundary
    pub fn is_vendor_failure(&self) -> bool {
        matches!(self, Self::Vendor(_) | Self::Timeout { .. })
    }

    /// Short machine-readable category used in logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Registry { .. } => "registry",
            Self::MemoryBackend { .. } => "memory_backend",
            Self::Vendor(_) => "vendor",
            Self::Timeout { .. } => "timeout",
            Self::NotFound { .. } => "not_found",
            Self::Storage { .. } => "storage",
            Self::Csv(_) => "csv",
            Self::ObjectStore { .. } => "object_store",
            Self::Config(_) => "config",
        }
    }
}
