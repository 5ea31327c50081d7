use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hianime_scraper::FetchErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request parameter
    #[error("{0}")]
    Validation(String),

    #[error("Category is required for query type: {0}")]
    MissingCategory(String),

    #[error("Invalid category for query type {query}. Valid categories: {valid}")]
    InvalidCategory { query: String, valid: String },

    #[error("Invalid query type: {0}")]
    InvalidQuery(String),

    /// Upstream failure on an endpoint without usable fallback data
    #[error("{message}")]
    Upstream {
        kind: FetchErrorKind,
        message: String,
    },

    #[error("An unexpected error occurred")]
    Internal,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::MissingCategory(_)
            | ApiError::InvalidCategory { .. }
            | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::MissingCategory(_) => "missing_category",
            ApiError::InvalidCategory { .. } => "invalid_category",
            ApiError::InvalidQuery(_) => "invalid_query",
            ApiError::Upstream { kind, .. } => kind.as_str(),
            ApiError::Internal => FetchErrorKind::UnexpectedError.as_str(),
        }
    }
}

/// Body of every failed response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = self.code(), "{}", self);
        } else {
            tracing::debug!(error = self.code(), "Rejected request: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
            error: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}
