//! Success envelope shared by every data endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::models::DataSource;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub source: DataSource,
    /// Why fallback data was served
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn external(data: T) -> Self {
        Self {
            success: true,
            data,
            source: DataSource::External,
            message: None,
        }
    }

    pub fn fallback(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            source: DataSource::Fallback,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
