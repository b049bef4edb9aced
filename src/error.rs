//! Error taxonomy and HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing required input.
    #[error("{0}")]
    Validation(String),

    /// Requested quantity exceeds available stock for the named product.
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    #[error("{0}")]
    NotFound(String),

    /// Caller authenticated but lacks the required role or ownership.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::OutOfStock(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage and dependency failures are logged, never exposed.
        let message = match &self {
            Self::Database(err) => {
                tracing::error!(error = %err, "database failure");
                "Internal server error".to_string()
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal failure");
                "Internal server error".to_string()
            }
            _ => {
                tracing::debug!(status = %status, message = %self, "request rejected");
                self.to_string()
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
