//! Error types for the group cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the group cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A group was built without a data source
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request data (empty key, malformed path)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Group not registered
    #[error("Group not found: {0}")]
    NotFound(String),

    /// The getter failed to produce a value; passed through untouched
    #[error(transparent)]
    Load(anyhow::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Config(_) | CacheError::Load(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the group cache.
pub type Result<T> = std::result::Result<T, CacheError>;
