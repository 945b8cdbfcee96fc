#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/growth-screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance data provider.
//!
//! This crate provides a Yahoo Finance data provider that implements the
//! [`DataProvider`] and [`FundamentalDataProvider`] traits from `screener-core`.
//!
//! # Features
//!
//! - Annual total revenue and net income from the fundamentals timeseries API
//! - Built-in rate limiting (1 request per second by default)
//! - Works for exchange-suffixed symbols such as `PTT.BK`
//!
//! # Example
//!
//! ```no_run
//! use screener_yahoo::YahooProvider;
//! use screener_core::{FundamentalDataProvider, Symbol};
//!
//! # async fn example() -> screener_core::Result<()> {
//! let provider = YahooProvider::new();
//! let rows = provider.fetch_annual_statements(&Symbol::new("PTT.BK")).await?;
//! println!("Fetched {} fiscal years", rows.len());
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use screener_core::{
    AnnualStatement, DataError, DataProvider, FundamentalDataProvider, Result, Symbol,
};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Yahoo Finance fundamentals timeseries API base URL.
const TIMESERIES_API_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Series requested for every symbol.
const REVENUE_SERIES: &str = "annualTotalRevenue";
const NET_INCOME_SERIES: &str = "annualNetIncome";

/// Default rate limit delay in milliseconds.
const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

/// Default HTTP timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Yahoo Finance data provider.
///
/// Implements [`DataProvider`] and [`FundamentalDataProvider`].
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
    history_start: NaiveDate,
    rate_limit_ms: u64,
    last_request_time: AtomicU64,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with default settings.
    ///
    /// Uses built-in rate limiting of 1 request per second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(DEFAULT_RATE_LIMIT_MS))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// Uses the provided client for all HTTP requests. Rate limiting
    /// is still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: TIMESERIES_API_URL.to_string(),
            history_start: default_history_start(),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Create a new Yahoo Finance provider with custom rate limiting.
    #[must_use]
    pub fn with_rate_limit(rate_limit: Duration) -> Self {
        Self::with_settings(rate_limit, DEFAULT_TIMEOUT)
    }

    /// Create a new Yahoo Finance provider with custom rate limiting and request timeout.
    #[must_use]
    pub fn with_settings(rate_limit: Duration, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            rate_limit_ms: rate_limit.as_millis() as u64,
            ..Self::with_client(client)
        }
    }

    /// Point the provider at a different timeseries endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply rate limiting before making a request.
    async fn apply_rate_limit(&self) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let last = self.last_request_time.load(Ordering::Relaxed);
        let elapsed = now.saturating_sub(last);

        if elapsed < self.rate_limit_ms {
            let wait_time = self.rate_limit_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait_time);
            sleep(Duration::from_millis(wait_time)).await;
        }

        self.last_request_time.store(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            Ordering::Relaxed,
        );
    }

    /// Build the timeseries URL for a symbol.
    fn build_timeseries_url(&self, symbol: &Symbol, end: NaiveDate) -> String {
        let start_ts = self
            .history_start
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt).timestamp())
            .unwrap_or(0);

        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| Utc.from_utc_datetime(&dt).timestamp())
            .unwrap_or(0);

        format!(
            "{}/{}?symbol={}&type={},{}&period1={}&period2={}",
            self.base_url,
            symbol.as_str(),
            symbol.as_str(),
            REVENUE_SERIES,
            NET_INCOME_SERIES,
            start_ts,
            end_ts
        )
    }

    /// Merge the revenue and net income series into one row per fiscal period.
    fn parse_timeseries_response(
        &self,
        symbol: &Symbol,
        response: TimeseriesResponse,
    ) -> Result<Vec<AnnualStatement>> {
        if let Some(error) = response.timeseries.error {
            return Err(DataError::Other(format!(
                "{}: {}",
                error.code, error.description
            )));
        }

        let mut rows: BTreeMap<NaiveDate, AnnualStatement> = BTreeMap::new();

        for series in response.timeseries.result {
            let Some(kind) = series.meta.kind.first() else {
                continue;
            };
            let Some(raw_points) = series.values.get(kind) else {
                continue;
            };

            let points: Vec<Option<DataPoint>> = serde_json::from_value(raw_points.clone())
                .map_err(|e| DataError::Parse(format!("{kind}: {e}")))?;

            for point in points.into_iter().flatten() {
                let Some(value) = point.reported_value.map(|v| v.raw) else {
                    continue;
                };
                let date = NaiveDate::parse_from_str(&point.as_of_date, "%Y-%m-%d")
                    .map_err(|e| DataError::Parse(format!("{}: {e}", point.as_of_date)))?;

                let row = rows
                    .entry(date)
                    .or_insert_with(|| AnnualStatement::new(symbol.clone(), date));

                match kind.as_str() {
                    REVENUE_SERIES => row.revenue = Some(value),
                    NET_INCOME_SERIES => row.net_income = Some(value),
                    other => debug!("Ignoring unrequested series {}", other),
                }
            }
        }

        if rows.is_empty() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        Ok(rows.into_values().collect())
    }
}

fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Yahoo Finance annual revenue and net income"
    }
}

#[async_trait]
impl FundamentalDataProvider for YahooProvider {
    async fn fetch_annual_statements(&self, symbol: &Symbol) -> Result<Vec<AnnualStatement>> {
        // Apply rate limiting
        self.apply_rate_limit().await;

        let url = self.build_timeseries_url(symbol, Utc::now().date_naive());
        debug!("Fetching annual statements: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: "Yahoo Finance".to_string(),
                retry_after: Some(Duration::from_secs(60)),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(DataError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let timeseries: TimeseriesResponse = response
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;

        self.parse_timeseries_response(symbol, timeseries)
    }
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

/// Fundamentals timeseries API response.
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesResult,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    #[serde(default)]
    result: Vec<TimeseriesSeries>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

/// One requested series; the data sits under a key named after `meta.type`.
#[derive(Debug, Deserialize)]
struct TimeseriesSeries {
    meta: SeriesMeta,
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SeriesMeta {
    #[serde(rename = "type", default)]
    kind: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    as_of_date: String,
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn point(date: &str, raw: f64) -> serde_json::Value {
        json!({
            "dataId": 20100,
            "asOfDate": date,
            "periodType": "12M",
            "currencyCode": "THB",
            "reportedValue": { "raw": raw, "fmt": format!("{raw}") }
        })
    }

    fn body() -> serde_json::Value {
        json!({
            "timeseries": {
                "result": [
                    {
                        "meta": { "symbol": ["PTT.BK"], "type": ["annualTotalRevenue"] },
                        "timestamp": [1640908800, 1672444800, 1703980800],
                        "annualTotalRevenue": [
                            point("2021-12-31", 2_258_818_000_000.0),
                            point("2022-12-31", 3_367_203_000_000.0),
                            null,
                            point("2023-12-31", 3_144_386_000_000.0)
                        ]
                    },
                    {
                        "meta": { "symbol": ["PTT.BK"], "type": ["annualNetIncome"] },
                        "timestamp": [1640908800, 1672444800],
                        "annualNetIncome": [
                            point("2021-12-31", 108_363_000_000.0),
                            point("2022-12-31", 91_175_000_000.0)
                        ]
                    }
                ],
                "error": null
            }
        })
    }

    fn test_provider(server: &MockServer) -> YahooProvider {
        YahooProvider::with_rate_limit(Duration::ZERO).with_base_url(server.uri())
    }

    #[test]
    fn test_build_timeseries_url() {
        let provider = YahooProvider::new();
        let symbol = Symbol::new("AOT.BK");
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        let url = provider.build_timeseries_url(&symbol, end);

        assert!(url.starts_with(TIMESERIES_API_URL));
        assert!(url.contains("/AOT.BK?symbol=AOT.BK"));
        assert!(url.contains("type=annualTotalRevenue,annualNetIncome"));
        assert!(url.contains("period1=946684800"));
    }

    #[test]
    fn test_provider_info() {
        let provider = YahooProvider::default();
        assert_eq!(provider.name(), "Yahoo Finance");
        assert!(!provider.description().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_merges_series_by_period() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/PTT.BK"))
            .and(query_param("type", "annualTotalRevenue,annualNetIncome"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let rows = provider
            .fetch_annual_statements(&Symbol::new("PTT.BK"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].period_end,
            NaiveDate::from_ymd_opt(2021, 12, 31).unwrap()
        );
        assert_eq!(rows[0].revenue, Some(2_258_818_000_000.0));
        assert_eq!(rows[0].net_income, Some(108_363_000_000.0));
        // 2023 has revenue but no reported net income
        assert_eq!(rows[2].revenue, Some(3_144_386_000_000.0));
        assert_eq!(rows[2].net_income, None);
    }

    #[tokio::test]
    async fn test_empty_series_is_symbol_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/NOPE.BK"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timeseries": {
                    "result": [
                        { "meta": { "symbol": ["NOPE.BK"], "type": ["annualTotalRevenue"] } },
                        { "meta": { "symbol": ["NOPE.BK"], "type": ["annualNetIncome"] } }
                    ],
                    "error": null
                }
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let err = provider
            .fetch_annual_statements(&Symbol::new("NOPE.BK"))
            .await
            .unwrap_err();

        assert!(matches!(err, DataError::SymbolNotFound(s) if s == "NOPE.BK"));
    }

    #[tokio::test]
    async fn test_http_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/SLOW.BK"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/BROKEN.BK"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/JUNK.BK"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = test_provider(&server);

        assert!(matches!(
            provider.fetch_annual_statements(&Symbol::new("SLOW.BK")).await,
            Err(DataError::RateLimited { .. })
        ));
        assert!(matches!(
            provider.fetch_annual_statements(&Symbol::new("BROKEN.BK")).await,
            Err(DataError::Network(_))
        ));
        assert!(matches!(
            provider.fetch_annual_statements(&Symbol::new("JUNK.BK")).await,
            Err(DataError::Parse(_))
        ));
        // unmatched paths return 404 from the mock server
        assert!(matches!(
            provider.fetch_annual_statements(&Symbol::new("GONE.BK")).await,
            Err(DataError::SymbolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timeseries": {
                    "result": [],
                    "error": { "code": "Bad Request", "description": "Invalid type" }
                }
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let err = provider
            .fetch_annual_statements(&Symbol::new("AOT.BK"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid type"));
    }
}
