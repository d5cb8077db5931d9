//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracker::TrackerError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin PIN missing or wrong.
    #[error("Admin authorization required")]
    AdminRequired,

    /// Engine error.
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ServerError::AdminRequired => (
                StatusCode::FORBIDDEN,
                "admin_required",
                "Admin authorization required".to_string(),
            ),
            ServerError::Tracker(e) => match e {
                TrackerError::AdminRequired => (
                    StatusCode::FORBIDDEN,
                    "admin_required",
                    e.to_string(),
                ),
                TrackerError::UserNotFound(_) | TrackerError::NotClockedIn(_) => {
                    (StatusCode::NOT_FOUND, "not_found", e.to_string())
                }
                TrackerError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_request", e.to_string())
                }
                TrackerError::Store(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    e.to_string(),
                ),
            },
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server handlers.
pub type ServerResult<T> = Result<T, ServerError>;
