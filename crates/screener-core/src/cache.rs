//! Cache trait for memoizing computed metric batches.
//!
//! This module defines the [`MetricCache`] trait and the [`RequestKey`] it is
//! keyed by. A request is identified by the exact ticker sequence and the
//! lookback; reordering the tickers is a different request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    types::{MetricRecord, Symbol},
};

/// Identifies one metric computation request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    /// Tickers in the order they were requested.
    pub tickers: Vec<Symbol>,
    /// Lookback in years.
    pub years: u32,
}

impl RequestKey {
    /// Creates a key for a ticker sequence and lookback.
    #[must_use]
    pub fn new(tickers: &[Symbol], years: u32) -> Self {
        Self {
            tickers: tickers.to_vec(),
            years,
        }
    }
}

/// Trait for caching computed metric batches.
///
/// Implementations own their time-to-live: an entry older than the TTL is
/// reported as a miss by [`get`](MetricCache::get) and recomputed by the caller.
#[async_trait]
pub trait MetricCache: Send + Sync {
    /// Retrieves the records cached for a request.
    ///
    /// Returns `Ok(Some(records))` if a fresh entry exists, `Ok(None)` otherwise.
    async fn get(&self, key: &RequestKey) -> Result<Option<Vec<MetricRecord>>>;

    /// Stores the records computed for a request.
    async fn put(&self, key: &RequestKey, records: &[MetricRecord]) -> Result<()>;

    /// Removes entries older than the cache's TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
