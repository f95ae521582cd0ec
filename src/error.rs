//! Unified error types for the todo service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::handlers::MessageResponse;

/// Unified error type for the todo service.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage layer errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Referenced item does not exist.
    #[error("not found")]
    NotFound,

    /// The `id` path segment is not an integer.
    #[error("invalid id")]
    InvalidId,

    /// The `done` path segment is not a boolean.
    #[error("invalid done value")]
    InvalidDone,

    /// Storage failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidId | ApiError::InvalidDone => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Store(e) => {
                error!(error = %e, "store operation failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, TodoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_statuses() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidDone.status(), StatusCode::BAD_REQUEST);

        let store = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_message_matches_wire_format() {
        assert_eq!(ApiError::NotFound.to_string(), "not found");
    }
}
