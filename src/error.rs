//! Domain error and its HTTP rendering.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const UNAUTHORIZED: &str = "Unauthorized";
pub const NOT_FOUND_OR_NOT_YOURS: &str = "Booking not found or not yours";
pub const INVALID_ENDPOINT: &str = "Invalid endpoint";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a missing, invalid or expired token.
    #[error("{0}")]
    Authentication(String),

    /// Duplicate email on registration.
    #[error("{0}")]
    Conflict(String),

    /// Record absent or owned by someone else.
    #[error("{0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized() -> Self {
        AppError::Authentication(UNAUTHORIZED.into())
    }

    pub fn invalid_credentials() -> Self {
        AppError::Authentication(INVALID_CREDENTIALS.into())
    }

    pub fn not_found_or_not_yours() -> Self {
        AppError::NotFound(NOT_FOUND_OR_NOT_YOURS.into())
    }
}

/// Fallback for unknown paths and for methods a known path does not serve.
pub async fn invalid_endpoint() -> AppError {
    AppError::NotFound(INVALID_ENDPOINT.into())
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Store(e) => {
                error!(error = %e, "store failure");
                json!({ "success": false, "message": "Database error", "error": e.to_string() })
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal failure");
                json!({ "success": false, "message": "Unexpected error", "error": e.to_string() })
            }
            other => json!({ "success": false, "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
