//! End-to-end screen: resolve, compute, filter, classify.

use std::sync::Arc;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use screener_cache::InMemoryCache;
use screener_core::{DataError, Formula, MetricRecord, ProgressObserver, Result, Symbol};

use crate::{
    engine::MetricEngine,
    filter::Thresholds,
    profile::{MarketProfile, ProviderChoice, ScreenerConfig},
    registry::ProviderRegistry,
    resolver::{Selection, TickerResolver},
};

/// How a screen ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScreenOutcome {
    /// The selection resolved to no tickers; nothing was fetched.
    EmptySelection,
    /// No ticker produced a record.
    NoData {
        /// Tickers that were requested.
        requested: usize,
    },
    /// Records were computed but none passed the thresholds.
    NoMatches {
        /// Tickers that were requested.
        requested: usize,
        /// Tickers that produced a record.
        fetched: usize,
    },
    /// At least one record passed.
    Matches(ScreenReport),
}

/// Records that passed a screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    /// Formula the records were computed with.
    pub formula: Formula,
    /// Suffix of the screened market, stripped for display.
    pub market_suffix: Option<String>,
    /// Tickers that were requested.
    pub requested: usize,
    /// Tickers that produced a record.
    pub fetched: usize,
    /// Surviving records, in ticker order.
    pub records: Vec<MetricRecord>,
}

impl ScreenReport {
    /// Returns the records sorted best first by [`Formula::primary_metric`].
    ///
    /// Ties keep ticker order. Records without a Rule of 40 score sort last.
    #[must_use]
    pub fn ranked(&self) -> Vec<MetricRecord> {
        let key = |record: &MetricRecord| match self.formula {
            Formula::GrowthPair => record.profit_growth,
            Formula::RuleOf40 => record.rule_of_40.unwrap_or(f64::NEG_INFINITY),
        };

        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
        ranked
    }

    /// Ticker as shown to users, without the market suffix.
    #[must_use]
    pub fn display_ticker<'a>(&self, symbol: &'a Symbol) -> &'a str {
        symbol.display_name(self.market_suffix.as_deref())
    }

    /// Converts the ranked records to a DataFrame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let ranked = self.ranked();

        let tickers: Vec<&str> = ranked.iter().map(|r| self.display_ticker(&r.symbol)).collect();
        let cagr: Vec<f64> = ranked.iter().map(|r| r.revenue_cagr).collect();
        let growth: Vec<f64> = ranked.iter().map(|r| r.profit_growth).collect();
        let margin: Vec<f64> = ranked.iter().map(|r| r.net_margin).collect();
        let rule_of_40: Vec<Option<f64>> = ranked.iter().map(|r| r.rule_of_40).collect();
        let revenue_bn: Vec<f64> = ranked.iter().map(|r| r.revenue_bn).collect();

        DataFrame::new(vec![
            Column::new("ticker".into(), tickers),
            Column::new("revenue_cagr".into(), cagr),
            Column::new("profit_growth".into(), growth),
            Column::new("net_margin".into(), margin),
            Column::new("rule_of_40".into(), rule_of_40),
            Column::new("revenue_bn".into(), revenue_bn),
        ])
        .map_err(|e| DataError::Other(e.to_string()))
    }
}

/// A market profile wired to a metric engine.
#[derive(Debug)]
pub struct Screener {
    profile: MarketProfile,
    engine: MetricEngine,
    years: u32,
}

impl Screener {
    /// Creates a screener from its parts.
    #[must_use]
    pub const fn new(profile: MarketProfile, engine: MetricEngine, years: u32) -> Self {
        Self {
            profile,
            engine,
            years,
        }
    }

    /// Builds the profile, providers and cache a configuration describes.
    pub fn from_config(config: &ScreenerConfig) -> Result<Self> {
        config.validate()?;

        let profile = config.profile.profile();
        let registry = build_registry(config)?;
        let cache = Arc::new(InMemoryCache::with_ttl(config.cache_ttl));
        let engine = MetricEngine::new(Arc::new(registry), profile.formula).with_cache(cache);

        Ok(Self::new(profile, engine, config.years))
    }

    /// Returns the market profile.
    #[must_use]
    pub const fn profile(&self) -> &MarketProfile {
        &self.profile
    }

    /// Returns the lookback in years.
    #[must_use]
    pub const fn years(&self) -> u32 {
        self.years
    }

    /// Resolves a selection against the profile.
    #[must_use]
    pub fn resolve(&self, selection: &Selection) -> Vec<Symbol> {
        TickerResolver::new(&self.profile).resolve(selection)
    }

    /// Runs a screen.
    ///
    /// Per-ticker failures only shrink the result, so this never fails.
    #[instrument(skip(self, thresholds, progress), fields(profile = self.profile.name()))]
    pub async fn run(
        &self,
        selection: &Selection,
        thresholds: &Thresholds,
        progress: &dyn ProgressObserver,
    ) -> ScreenOutcome {
        let tickers = self.resolve(selection);
        if tickers.is_empty() {
            info!("Selection resolved to no tickers");
            return ScreenOutcome::EmptySelection;
        }

        let requested = tickers.len();
        let records = self.engine.compute(&tickers, self.years, progress).await;
        if records.is_empty() {
            return ScreenOutcome::NoData { requested };
        }

        let fetched = records.len();
        let chain = thresholds.chain();
        let records = chain.apply(records);
        info!(requested, fetched, passed = records.len(), filter = %chain.describe(), "Screen complete");

        if records.is_empty() {
            return ScreenOutcome::NoMatches { requested, fetched };
        }

        ScreenOutcome::Matches(ScreenReport {
            formula: self.engine.formula(),
            market_suffix: self.profile.market_suffix.clone(),
            requested,
            fetched,
            records,
        })
    }
}

fn build_registry(config: &ScreenerConfig) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    #[cfg(feature = "yahoo")]
    if matches!(config.provider, ProviderChoice::Yahoo | ProviderChoice::Auto) {
        registry.register(Arc::new(screener_yahoo::YahooProvider::with_settings(
            config.rate_limit,
            config.request_timeout,
        )));
    }

    #[cfg(feature = "fmp")]
    if matches!(config.provider, ProviderChoice::Fmp | ProviderChoice::Auto) {
        if let Some(key) = &config.fmp_api_key {
            registry.register(Arc::new(screener_fmp::FmpProvider::with_timeout(
                key.as_str(),
                config.request_timeout,
            )));
        }
    }

    if registry.is_empty() {
        return Err(DataError::ProviderNotConfigured(format!(
            "no provider available for {:?}",
            config.provider
        )));
    }
    Ok(registry)
}
