//! Error types for the dashboard API.
//!
//! Upstream failures on collection endpoints never reach this type; they
//! degrade to an empty collection inside the handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use open_data::{FetchError, TileRequestError};
use serde::Serialize;
use thiserror::Error;

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Invalid tile request: {0}")]
    InvalidTileRequest(#[from] TileRequestError),

    #[error("Tile upstream failed: {0}")]
    TileUpstream(FetchError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCity(_) | ApiError::InvalidTileRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TileUpstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
