//! Application Error Types
//!
//! Centralized error handling with Axum integration.
//!
//! Every failure leaving a handler is rendered as the uniform envelope
//! `{ "message": string, "details"?: [string] }`. Internal causes are logged
//! server-side and never forwarded to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Public message for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "It's a shame. We beg your pardon!";

/// Public message for every authorization failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl AppError {
    /// Validation error without field details.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// HTTP status carrying the error classification.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) | AppError::Validation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, details) = match self {
            AppError::NotFound(msg) | AppError::Conflict(msg) => (msg, None),
            AppError::Unauthorized(reason) => {
                tracing::debug!(%reason, "Request rejected as unauthorized");
                (UNAUTHORIZED_MESSAGE.to_string(), None)
            }
            AppError::Validation { message, details } => {
                let details = if details.is_empty() { None } else { Some(details) };
                (message, details)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
        };

        (status, Json(ErrorResponse { message, details })).into_response()
    }
}
