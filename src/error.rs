//! API error kinds and their HTTP mapping.
//!
//! Every error that leaves a handler or a guard is rendered as a failure
//! envelope; nothing on an API path produces an HTML error page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::http::response::fail;

/// Errors surfaced by handlers and by the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No session, or the session could not be resolved.
    #[error("Unauthorized")]
    Unauthenticated,

    /// Valid session lacking the required role.
    #[error("{0}")]
    Forbidden(String),

    /// Double-submit token missing or mismatched.
    #[error("CSRF validation failed")]
    CsrfRejected,

    #[error("{0}")]
    NotFound(String),

    /// Handler did not finish within the configured request timeout.
    #[error("Request timed out")]
    TimedOut,

    /// Retired endpoint.
    #[error("{0}")]
    Gone(String),

    /// Malformed input, reported by the handler itself.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn gone(message: impl Into<String>) -> Self {
        Self::Gone(message.into())
    }

    pub fn validation(message: impl Into<String>, details: Option<Value>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::CsrfRejected => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TimedOut => StatusCode::REQUEST_TIMEOUT,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the envelope's `error` field.
    ///
    /// Internal errors never leak their cause to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error description attached to failure responses so the correlation layer
/// can log it next to the correlation id.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            ApiError::Validation { details, .. } => details.clone(),
            _ => None,
        };

        let mut response = fail(status, self.public_message(), details).into_response();
        response.extensions_mut().insert(ErrorReport {
            status,
            message: self.to_string(),
        });
        response
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("serialization failed: {err}"))
    }
}
