//! Resilient access to the upstream sites.
//!
//! [`Fetcher::fetch`] never returns an error: the outcome of a request is
//! always a [`FetchResult`], which the caller matches on to decide between
//! extraction and fallback data.

mod cache;
mod client;

pub use cache::{CacheStats, MemoryCache, ResponseCache};
pub use client::{Fetcher, USER_AGENTS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which upstream site a request goes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Upstream {
    #[default]
    Primary,
    Secondary,
}

impl Upstream {
    /// Prefix of the default cache key
    pub fn namespace(&self) -> &'static str {
        match self {
            Upstream::Primary => "anime_api",
            Upstream::Secondary => "anime_api_v2",
        }
    }
}

/// Failure classification of an upstream request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The attempt ran past its timeout
    Timeout,
    /// Connection failure, non-success status or unreadable body
    RequestError,
    /// Anything else
    UnexpectedError,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::RequestError => "request_error",
            FetchErrorKind::UnexpectedError => "unexpected_error",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`Fetcher::fetch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchResult {
    Success {
        body: String,
        #[serde(rename = "statusCode")]
        status_code: u16,
    },
    Failure {
        error: FetchErrorKind,
        message: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }
}

/// Per-call options of [`Fetcher::fetch`]
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub upstream: Upstream,
    pub use_cache: bool,
    /// Overrides the `{namespace}:{endpoint}` key
    pub cache_key: Option<String>,
    /// Per-attempt timeout; the fetcher's default when `None`
    pub timeout: Option<Duration>,
    /// Retries after the first attempt
    pub max_retries: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            upstream: Upstream::Primary,
            use_cache: true,
            cache_key: None,
            timeout: None,
            max_retries: 3,
        }
    }
}

impl FetchOptions {
    pub fn secondary() -> Self {
        Self {
            upstream: Upstream::Secondary,
            ..Default::default()
        }
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Cache key for `endpoint` under these options
    pub fn key_for(&self, endpoint: &str) -> String {
        match &self.cache_key {
            Some(key) => key.clone(),
            None => format!("{}:{}", self.upstream.namespace(), endpoint),
        }
    }
}

/// Exponential backoff between attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub unit: Duration,
    pub cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(1),
            cap: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before `attempt` (1-based retry number): `(2^attempt + jitter) * unit`,
    /// never more than `cap`. `jitter` is expected in `[0, 1)`.
    pub fn delay(&self, attempt: u32, jitter: f64) -> Duration {
        let factor = 2f64.powi(attempt.min(62) as i32) + jitter.clamp(0.0, 1.0);
        let secs = (factor * self.unit.as_secs_f64()).min(self.cap.as_secs_f64());
        Duration::from_secs_f64(secs.max(0.0))
    }
}
