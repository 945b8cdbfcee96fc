#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/growth-screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) data provider.
//!
//! This crate implements the screener-core provider traits for the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use screener_fmp::FmpProvider;
//! use screener_core::{FundamentalDataProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FmpProvider::new("your_api_key");
//!     let rows = provider.fetch_annual_statements(&Symbol::new("CRM")).await?;
//!     println!("{} fiscal years", rows.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use screener_core::{
    AnnualStatement, DataError, DataProvider, FundamentalDataProvider, Result, Symbol,
};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep data provider.
///
/// Provides annual income statements; only revenue and net income are kept.
#[derive(Clone)]
pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for FmpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new FMP provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
        }
    }

    /// Create a new FMP provider whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        });
        Self::with_client(client, api_key)
    }

    /// Point the provider at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a URL with the API key appended.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{}/{endpoint}&apikey={}", self.base_url, self.api_key)
        } else {
            format!("{}/{endpoint}?apikey={}", self.base_url, self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!("FMP request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: "FMP".to_string(),
                retry_after: None,
            });
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DataError::AuthenticationFailed("FMP".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Network(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        // Check for FMP error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(DataError::Network(text));
        }

        serde_json::from_str(&text).map_err(|e| DataError::Parse(format!("{e}: {text}")))
    }
}

impl DataProvider for FmpProvider {
    fn name(&self) -> &str {
        "FMP"
    }

    fn description(&self) -> &str {
        "Financial Modeling Prep - Financial data and stock market API"
    }
}

#[async_trait]
impl FundamentalDataProvider for FmpProvider {
    async fn fetch_annual_statements(&self, symbol: &Symbol) -> Result<Vec<AnnualStatement>> {
        let endpoint = format!("income-statement?symbol={}&period=annual", symbol.as_str());
        let income_statements: Vec<FmpIncomeStatement> = self.get(&endpoint).await?;

        let mut statements = Vec::with_capacity(income_statements.len());
        for income in income_statements {
            let date = match NaiveDate::parse_from_str(&income.date, "%Y-%m-%d") {
                Ok(d) => d,
                Err(_) => continue,
            };

            statements.push(AnnualStatement {
                symbol: symbol.clone(),
                period_end: date,
                revenue: income.revenue,
                net_income: income.net_income,
            });
        }

        if statements.is_empty() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        Ok(statements)
    }
}

// ============================================================================
// FMP API Response Types
// ============================================================================

/// FMP Income Statement response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpIncomeStatement {
    date: String,
    revenue: Option<f64>,
    net_income: Option<f64>,
}
