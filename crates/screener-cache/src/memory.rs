//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use screener_core::{MetricCache, MetricRecord, RequestKey, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Default time-to-live for cached batches (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: chrono::DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX)
    }
}

type Entries = HashMap<RequestKey, CacheEntry<Vec<MetricRecord>>>;

/// Drops every entry older than `ttl` and returns how many went.
fn evict_stale(entries: &mut Entries, ttl: Duration) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_stale(ttl));
    before - entries.len()
}

/// In-process cache of metric batches.
///
/// Entries live in a `RwLock`-protected `HashMap` and are lost when the cache
/// is dropped. A lookup that finds an entry older than the TTL evicts it and
/// reports a miss. Every `put` also sweeps out whatever else has expired, so
/// a long-lived cache holds at most one TTL window of batches.
#[derive(Debug)]
pub struct InMemoryCache {
    ttl: Duration,
    entries: RwLock<Entries>,
}

impl InMemoryCache {
    /// Create a new empty cache with the default one-hour TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a new empty cache whose entries expire after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::default(),
        }
    }

    /// Returns the configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the number of entries held, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no entries are held.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricCache for InMemoryCache {
    #[instrument(skip(self, key), fields(tickers = key.tickers.len(), years = key.years))]
    async fn get(&self, key: &RequestKey) -> Result<Option<Vec<MetricRecord>>> {
        {
            let cache = self.entries.read().await;
            match cache.get(key) {
                Some(entry) if !entry.is_stale(self.ttl) => {
                    debug!("Cache hit for metric batch");
                    return Ok(Some(entry.data.clone()));
                }
                Some(_) => {}
                None => {
                    debug!("Cache miss for metric batch");
                    return Ok(None);
                }
            }
        }

        // Stale: drop it so the next put starts a fresh window
        let mut cache = self.entries.write().await;
        if cache.get(key).is_some_and(|entry| entry.is_stale(self.ttl)) {
            cache.remove(key);
        }
        debug!("Cache entry expired for metric batch");
        Ok(None)
    }

    #[instrument(skip(self, key, records), fields(tickers = key.tickers.len(), years = key.years, count = records.len()))]
    async fn put(&self, key: &RequestKey, records: &[MetricRecord]) -> Result<()> {
        let mut cache = self.entries.write().await;
        let evicted = evict_stale(&mut cache, self.ttl);
        if evicted > 0 {
            debug!("Evicted {} stale cache entries", evicted);
        }
        cache.insert(key.clone(), CacheEntry::new(records.to_vec()));
        debug!("Cached {} metric records", records.len());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self) -> Result<usize> {
        let mut cache = self.entries.write().await;
        let removed = evict_stale(&mut cache, self.ttl);

        if removed > 0 {
            debug!("Invalidated {} stale cache entries", removed);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}
