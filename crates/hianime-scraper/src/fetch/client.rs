//! Upstream HTTP client with caching, user-agent rotation and retry logic.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::Client;
use shared::config::{Config, UpstreamConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{FetchErrorKind, FetchOptions, FetchResult, ResponseCache, RetryPolicy, Upstream};

/// Browser user agents, one picked at random per attempt
pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// A single failed attempt
struct AttemptFailure {
    kind: FetchErrorKind,
    message: String,
}

impl From<reqwest::Error> for AttemptFailure {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            FetchErrorKind::Timeout
        } else if e.is_builder() {
            FetchErrorKind::UnexpectedError
        } else {
            FetchErrorKind::RequestError
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

/// Fetches upstream pages as [`FetchResult`]s
pub struct Fetcher {
    /// HTTP client
    client: Client,
    /// Base URL of the primary site
    base_url: String,
    /// Base URL of the secondary site
    base_url_v2: String,
    /// Default per-attempt timeout
    timeout: Duration,
    /// Backoff between attempts
    retry: RetryPolicy,
    /// Configured retries after the first attempt
    max_retries: u32,
    /// Shared response cache
    cache: Arc<dyn ResponseCache>,
    /// Lifetime of cached successes
    cache_ttl: Duration,
}

impl Fetcher {
    /// Create a new fetcher for the configured upstream sites
    pub fn new(
        upstream: &UpstreamConfig,
        cache: Arc<dyn ResponseCache>,
        cache_ttl: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &upstream.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name in config: {}", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            base_url_v2: upstream.base_url_v2.trim_end_matches('/').to_string(),
            timeout: upstream.timeout(),
            retry: RetryPolicy {
                unit: upstream.backoff_unit(),
                cap: upstream.max_backoff(),
            },
            max_retries: upstream.max_retries,
            cache,
            cache_ttl,
        })
    }

    /// Create a fetcher from the full configuration
    pub fn from_config(config: &Config, cache: Arc<dyn ResponseCache>) -> Result<Self> {
        Self::new(&config.upstream, cache, config.cache.ttl())
    }

    pub fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Primary => &self.base_url,
            Upstream::Secondary => &self.base_url_v2,
        }
    }

    /// Default request options, carrying the configured retry count
    pub fn options(&self) -> FetchOptions {
        FetchOptions::default().with_max_retries(self.max_retries)
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    /// GET `endpoint` from the chosen upstream.
    ///
    /// A cached result is returned verbatim. Otherwise up to
    /// `max_retries + 1` attempts are made with backoff in between; only the
    /// last failure is returned, and only successes are cached.
    pub async fn fetch(&self, endpoint: &str, options: FetchOptions) -> FetchResult {
        let url = format!("{}{}", self.base_url(options.upstream), endpoint);
        let cache_key = options.key_for(endpoint);

        if options.use_cache {
            if let Some(cached) = self.cache.get(&cache_key).await {
                info!(cache_key = %cache_key, "Cache hit");
                return cached;
            }
        }

        let timeout = options.timeout.unwrap_or(self.timeout);
        let max_attempts = options.max_retries + 1;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = self.retry.delay(attempt, rand::random::<f64>());
                info!(
                    url = %url,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after delay"
                );
                sleep(delay).await;
            }

            debug!(url = %url, attempt = attempt + 1, "Making upstream request");

            match self.attempt(&url, timeout).await {
                Ok(result) => {
                    if options.use_cache {
                        self.cache
                            .set(&cache_key, result.clone(), self.cache_ttl)
                            .await;
                        debug!(cache_key = %cache_key, "Cached upstream response");
                    }
                    return result;
                }
                Err(failure) => {
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        max_attempts = max_attempts,
                        error = %failure.kind,
                        message = %failure.message,
                        "Upstream request failed"
                    );

                    if attempt >= options.max_retries {
                        return FetchResult::Failure {
                            error: failure.kind,
                            message: failure.message,
                        };
                    }
                }
            }

            attempt += 1;
        }
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> Result<FetchResult, AttemptFailure> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(CONNECTION, "keep-alive")
            .header(UPGRADE_INSECURE_REQUESTS, "1")
            .send()
            .await?
            .error_for_status()?;

        let status_code = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchResult::Success { body, status_code })
    }
}
