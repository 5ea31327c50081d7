use anyhow::{Context, Result};
use hianime_scraper::{FallbackProvider, Fetcher, MemoryCache, ResponseCache};
use shared::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<Fetcher>,
    pub fallback: Arc<FallbackProvider>,
}

impl AppState {
    /// Build the state from configuration, with an in-memory response cache
    pub fn new(config: Config) -> Result<Self> {
        let cache: Arc<dyn ResponseCache> = Arc::new(MemoryCache::new(config.cache.enabled));
        let fetcher = Fetcher::from_config(&config, cache).context("Failed to create fetcher")?;

        Ok(Self::from_parts(config, fetcher, FallbackProvider::default()))
    }

    pub fn from_parts(config: Config, fetcher: Fetcher, fallback: FallbackProvider) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            fallback: Arc::new(fallback),
        }
    }
}
