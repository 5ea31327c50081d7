//! Per-request flow from upstream fetch to API response.
//!
//! ```text
//! Fetch -> Success -> Extract -> Respond(external)
//!       -> Failure -> Fallback -> Respond(fallback)
//! Extract panics -> Fallback
//! Fallback fails -> 500
//! ```
//!
//! Nothing here retries; retries belong to the fetcher.

use hianime_scraper::{FallbackError, FallbackProvider, FetchErrorKind, FetchOptions, FetchResult};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, warn};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Why a request ended up on fallback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCause {
    /// The upstream fetch failed
    Unavailable(FetchErrorKind),
    /// Extraction of a fetched page panicked
    ExtractionFailed,
}

impl FallbackCause {
    pub fn message(&self) -> &'static str {
        match self {
            FallbackCause::Unavailable(_) => {
                "Using fallback data due to external API unavailability"
            }
            FallbackCause::ExtractionFailed => "Using fallback data due to unexpected error",
        }
    }

    /// Error code reported when the fallback fails as well
    pub fn error_kind(&self) -> FetchErrorKind {
        match self {
            FallbackCause::Unavailable(kind) => *kind,
            FallbackCause::ExtractionFailed => FetchErrorKind::UnexpectedError,
        }
    }
}

/// Fetch `endpoint`, extract it, and fall back to demo data on any failure
pub async fn resolve<T, X, F>(
    state: &AppState,
    endpoint: &str,
    options: FetchOptions,
    extract: X,
    fallback: F,
) -> Result<ApiResponse<T>, ApiError>
where
    X: FnOnce(&str) -> T,
    F: FnOnce(&FallbackProvider) -> Result<T, FallbackError>,
{
    let cause = match state.fetcher.fetch(endpoint, options).await {
        FetchResult::Success { body, .. } => match guarded(endpoint, extract, &body) {
            Some(data) => return Ok(ApiResponse::external(data)),
            None => FallbackCause::ExtractionFailed,
        },
        FetchResult::Failure { error, message } => {
            warn!(
                endpoint = endpoint,
                error = %error,
                message = %message,
                "External API failed, using fallback data"
            );
            FallbackCause::Unavailable(error)
        }
    };

    serve_fallback(&state.fallback, cause, fallback)
}

/// Fetch and extract `endpoint` for routes with no fallback data
pub async fn resolve_external<T, X>(
    state: &AppState,
    endpoint: &str,
    options: FetchOptions,
    extract: X,
) -> Result<ApiResponse<T>, ApiError>
where
    X: FnOnce(&str) -> T,
{
    match state.fetcher.fetch(endpoint, options).await {
        FetchResult::Success { body, .. } => guarded(endpoint, extract, &body)
            .map(ApiResponse::external)
            .ok_or(ApiError::Internal),
        FetchResult::Failure { error, message } => {
            error!(endpoint = endpoint, error = %error, "Failed to fetch: {}", message);
            Err(ApiError::Upstream {
                kind: error,
                message,
            })
        }
    }
}

pub fn serve_fallback<T, F>(
    provider: &FallbackProvider,
    cause: FallbackCause,
    fallback: F,
) -> Result<ApiResponse<T>, ApiError>
where
    F: FnOnce(&FallbackProvider) -> Result<T, FallbackError>,
{
    match fallback(provider) {
        Ok(data) => Ok(ApiResponse::fallback(data, cause.message())),
        Err(e) => {
            error!(error = %e, "Fallback data also failed");
            Err(ApiError::Upstream {
                kind: cause.error_kind(),
                message: "An unexpected error occurred".to_string(),
            })
        }
    }
}

/// Run an extractor, turning a panic into `None`
fn guarded<T, X>(endpoint: &str, extract: X, body: &str) -> Option<T>
where
    X: FnOnce(&str) -> T,
{
    match catch_unwind(AssertUnwindSafe(|| extract(body))) {
        Ok(data) => Some(data),
        Err(_) => {
            error!(endpoint = endpoint, "Extraction panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::DataSource;

    #[test]
    fn test_fallback_messages() {
        let provider = FallbackProvider::default();

        let response = serve_fallback(
            &provider,
            FallbackCause::Unavailable(FetchErrorKind::Timeout),
            |p| Ok(p.genres()),
        )
        .unwrap();
        assert_eq!(response.source, DataSource::Fallback);
        assert_eq!(
            response.message.as_deref(),
            Some("Using fallback data due to external API unavailability")
        );

        let response =
            serve_fallback(&provider, FallbackCause::ExtractionFailed, |p| Ok(p.genres())).unwrap();
        assert_eq!(
            response.message.as_deref(),
            Some("Using fallback data due to unexpected error")
        );
    }

    #[test]
    fn test_failed_fallback_keeps_fetch_error() {
        let empty = FallbackProvider::new(Vec::new(), Vec::new());

        let err = serve_fallback(
            &empty,
            FallbackCause::Unavailable(FetchErrorKind::Timeout),
            |p| p.episodes("x"),
        )
        .unwrap_err();
        assert_eq!(err.code(), "timeout");

        let err = serve_fallback(&empty, FallbackCause::ExtractionFailed, |p| p.homepage())
            .unwrap_err();
        assert_eq!(err.code(), "unexpected_error");
    }

    #[test]
    fn test_guarded_catches_panics() {
        assert_eq!(guarded("/home", |body| body.len(), "abc"), Some(3));
        let result: Option<usize> = guarded("/home", |_| panic!("bad markup"), "abc");
        assert_eq!(result, None);
    }
}
