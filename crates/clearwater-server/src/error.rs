use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clearwater_rag::RagError;
use serde_json::json;

/// Shape of the JSON error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBody {
    /// `{"success": false, "error": {"code", "message"}}`
    Standard,
    /// `{"success": false, "response": message}`, what the chat UI expects from agent routes
    Envelope,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: ErrorBody::Standard,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", resource))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Render as an unsuccessful agent envelope
    pub fn envelope(mut self) -> Self {
        self.body = ErrorBody::Envelope;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.body {
            ErrorBody::Standard => json!({
                "success": false,
                "error": {
                    "code": self.status.as_u16(),
                    "message": self.message,
                }
            }),
            ErrorBody::Envelope => json!({
                "success": false,
                "response": self.message,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        let status = match &err {
            RagError::Validation { .. } => StatusCode::BAD_REQUEST,
            RagError::NotFound { .. } => StatusCode::NOT_FOUND,
            RagError::Vendor(_) => StatusCode::BAD_GATEWAY,
            RagError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, category = err.category(), "API error");
        } else {
            tracing::warn!(error = %err, category = err.category(), "Request rejected");
        }
        Self::new(status, err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "API error");
        Self::internal(err.to_string())
    }
}
