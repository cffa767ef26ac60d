//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::preferences::PreferenceError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] cockpit_engine::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Preference error: {0}")]
    Preferences(#[from] PreferenceError),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    /// Offending attribute key for serialization failures
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Engine(e) => {
                tracing::warn!("Engine error: {:?}", e);
                let status = match e {
                    cockpit_engine::Error::InvalidRecord(_) => StatusCode::BAD_REQUEST,
                    cockpit_engine::Error::Serialization { .. }
                    | cockpit_engine::Error::MalformedDiff { .. } => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, e.to_string(), e.key().map(str::to_string))
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::Preferences(e) => {
                tracing::warn!("Preference error: {}", e);
                (StatusCode::INSUFFICIENT_STORAGE, e.to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
