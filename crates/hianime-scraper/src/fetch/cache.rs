//! Response cache for upstream fetches.
//!
//! Entries are kept in process memory with a per-entry expiry; expired
//! entries are dropped lazily when read.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::FetchResult;

/// Storage used by the fetcher to remember successful responses
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<FetchResult>;

    async fn set(&self, key: &str, value: FetchResult, ttl: Duration);

    async fn clear(&self);
}

struct CacheEntry {
    value: FetchResult,
    expires_at: Instant,
}

/// Process-wide in-memory cache
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    /// Whether caching is enabled
    enabled: bool,
}

impl MemoryCache {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            info!("Response cache initialized");
        }
        Self {
            entries: Mutex::new(HashMap::new()),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries();
        let now = Instant::now();
        let expired_entries = entries.values().filter(|e| e.expires_at <= now).count();

        CacheStats {
            total_entries: entries.len(),
            expired_entries,
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<FetchResult> {
        if !self.enabled {
            return None;
        }

        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                debug!(key = key, "Cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                debug!(key = key, "Cache entry expired");
                None
            }
            None => {
                debug!(key = key, "Cache miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: FetchResult, ttl: Duration) {
        if !self.enabled {
            return;
        }

        let expires_at = Instant::now() + ttl;
        self.entries()
            .insert(key.to_string(), CacheEntry { value, expires_at });
        debug!(key = key, ttl_secs = ttl.as_secs(), "Cache stored");
    }

    async fn clear(&self) {
        self.entries().clear();
        info!("Cache cleared");
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> FetchResult {
        FetchResult::Success {
            body: body.to_string(),
            status_code: 200,
        }
    }

    #[tokio::test]
    async fn test_cache_enabled() {
        let cache = MemoryCache::new(true);
        cache.set("anime_api:/home", page("home"), Duration::from_secs(60)).await;

        let retrieved = cache.get("anime_api:/home").await;
        assert_eq!(retrieved, Some(page("home")));
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let cache = MemoryCache::new(false);

        // Store should succeed but do nothing
        cache.set("anime_api:/home", page("home"), Duration::from_secs(60)).await;

        assert_eq!(cache.get("anime_api:/home").await, None);
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = MemoryCache::default();
        assert_eq!(cache.get("nonexistent").await, None);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_on_read() {
        let cache = MemoryCache::new(true);
        cache.set("short", page("a"), Duration::ZERO).await;
        cache.set("long", page("b"), Duration::from_secs(60)).await;

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);

        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.stats().total_entries, 1);
    }

    #[tokio::test]
    async fn test_last_writer_wins_and_clear() {
        let cache = MemoryCache::new(true);
        cache.set("k", page("first"), Duration::from_secs(60)).await;
        cache.set("k", page("second"), Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, Some(page("second")));

        cache.clear().await;
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
