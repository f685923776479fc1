use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

static PRODUCTION: OnceLock<bool> = OnceLock::new();

/// Latch the production flag once at startup. In production mode 500-class
/// error messages are masked before leaving the process.
pub fn set_production(on: bool) {
    let _ = PRODUCTION.set(on);
}

fn production() -> bool {
    PRODUCTION.get().copied().unwrap_or(false)
}

/// Domain error taxonomy surfaced by every handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),
    /// No usable credential on the request.
    #[error("{0}")]
    Unauthorized(String),
    /// Credential present but rejected, or role not allowed.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// Duplicate resource, e.g. an already-registered email.
    #[error("{0}")]
    Conflict(String),
    /// Weather provider failure other than an unknown city.
    #[error("{0}")]
    Upstream(String),
    /// Datastore or cache failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::Upstream(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
            if production() {
                "internal server error".to_string()
            } else {
                self.to_string()
            }
        } else {
            self.to_string()
        };
        (status, Json(ErrorEnvelope { success: false, error })).into_response()
    }
}
