//! Batch metric computation with read-through caching.

use std::{fmt, sync::Arc};

use tracing::{debug, instrument, warn};

use screener_cache::InMemoryCache;
use screener_core::{
    Formula, FundamentalDataProvider, MetricCache, MetricRecord, ProgressObserver, RequestKey,
    Symbol, compute_record,
};

/// Computes growth metrics for ticker batches.
///
/// Tickers are fetched one at a time. A ticker whose fetch fails or whose
/// history cannot support the lookback is left out of the result; the batch
/// itself never fails.
pub struct MetricEngine {
    provider: Arc<dyn FundamentalDataProvider>,
    cache: Arc<dyn MetricCache>,
    formula: Formula,
}

impl fmt::Debug for MetricEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricEngine")
            .field("provider", &self.provider.name())
            .field("formula", &self.formula)
            .finish_non_exhaustive()
    }
}

impl MetricEngine {
    /// Creates an engine backed by an in-memory cache with the default TTL.
    #[must_use]
    pub fn new(provider: Arc<dyn FundamentalDataProvider>, formula: Formula) -> Self {
        Self {
            provider,
            cache: Arc::new(InMemoryCache::new()),
            formula,
        }
    }

    /// Replaces the cache.
    ///
    /// A cache must not be shared between engines using different formulas,
    /// since the request key does not include the formula.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn MetricCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the formula records are computed with.
    #[must_use]
    pub const fn formula(&self) -> Formula {
        self.formula
    }

    /// Computes one record per ticker that has enough usable history.
    ///
    /// Records come back in ticker order. A fresh cached batch for the same
    /// tickers and lookback is returned as-is without notifying `progress`.
    #[instrument(skip(self, tickers, progress), fields(tickers = tickers.len()))]
    pub async fn compute(
        &self,
        tickers: &[Symbol],
        years: u32,
        progress: &dyn ProgressObserver,
    ) -> Vec<MetricRecord> {
        if years == 0 {
            warn!("Lookback of zero years has no growth rate, nothing computed");
            return Vec::new();
        }

        let key = RequestKey::new(tickers, years);
        match self.cache.get(&key).await {
            Ok(Some(records)) => {
                debug!(count = records.len(), "Using cached metric batch");
                return records;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache lookup failed, recomputing"),
        }

        let records = self.compute_uncached(tickers, years, progress).await;

        if let Err(e) = self.cache.put(&key, &records).await {
            warn!(error = %e, "Failed to cache metric batch");
        }
        records
    }

    async fn compute_uncached(
        &self,
        tickers: &[Symbol],
        years: u32,
        progress: &dyn ProgressObserver,
    ) -> Vec<MetricRecord> {
        let total = tickers.len();
        let mut records = Vec::with_capacity(total);

        for (i, symbol) in tickers.iter().enumerate() {
            progress.on_progress(i + 1, total, symbol);

            let statements = match self.provider.fetch_annual_statements(symbol).await {
                Ok(statements) => statements,
                Err(e) => {
                    warn!(
                        provider = self.provider.name(),
                        symbol = %symbol,
                        error = %e,
                        "Fetch failed, skipping ticker"
                    );
                    continue;
                }
            };

            match compute_record(symbol, &statements, years, self.formula) {
                Ok(record) => records.push(record),
                Err(reason) => debug!(symbol = %symbol, %reason, "Skipping ticker"),
            }
        }

        progress.on_finish();
        debug!(computed = records.len(), requested = total, "Metric batch complete");
        records
    }
}
