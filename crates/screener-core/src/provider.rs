//! Provider traits for fetching financial statements.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FundamentalDataProvider`] - Annual income statement figures

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{AnnualStatement, Symbol},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for annual fundamental data.
#[async_trait]
pub trait FundamentalDataProvider: DataProvider {
    /// Fetches the annual statements a provider has for a symbol.
    ///
    /// Rows carry total revenue and net income; the order is unspecified.
    async fn fetch_annual_statements(&self, symbol: &Symbol) -> Result<Vec<AnnualStatement>>;
}
