//! Core data types for the screener.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Exchange-qualified ticker symbol
//! - [`AnnualStatement`] - One fiscal year of reported figures
//! - [`MetricRecord`] - Growth metrics derived for one ticker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol already ends with `suffix`, ignoring case.
    #[must_use]
    pub fn has_suffix(&self, suffix: &str) -> bool {
        !suffix.is_empty() && self.0.ends_with(&suffix.to_uppercase())
    }

    /// Appends a market suffix (e.g. `.BK`) unless it is already present.
    #[must_use]
    pub fn with_suffix(self, suffix: &str) -> Self {
        if suffix.is_empty() || self.has_suffix(suffix) {
            self
        } else {
            Self::new(format!("{}{suffix}", self.0))
        }
    }

    /// Returns the symbol without the given market suffix, for display.
    #[must_use]
    pub fn display_name(&self, suffix: Option<&str>) -> &str {
        match suffix {
            Some(s) if !s.is_empty() => {
                self.0.strip_suffix(s.to_uppercase().as_str()).unwrap_or(&self.0)
            }
            _ => &self.0,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Reported income statement figures for a single fiscal year.
///
/// Providers leave a field as `None` when the period did not report it; the
/// metric formulas treat a missing figure as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatement {
    /// Stock symbol.
    pub symbol: Symbol,
    /// End date of the fiscal period.
    pub period_end: NaiveDate,
    /// Total revenue, in reporting currency units.
    pub revenue: Option<f64>,
    /// Net income, in reporting currency units.
    pub net_income: Option<f64>,
}

impl AnnualStatement {
    /// Creates a statement row with no figures filled in.
    #[must_use]
    pub const fn new(symbol: Symbol, period_end: NaiveDate) -> Self {
        Self {
            symbol,
            period_end,
            revenue: None,
            net_income: None,
        }
    }

    /// Sets the total revenue.
    #[must_use]
    pub const fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    /// Sets the net income.
    #[must_use]
    pub const fn with_net_income(mut self, net_income: f64) -> Self {
        self.net_income = Some(net_income);
        self
    }
}

/// Growth metrics derived for one ticker over a lookback window.
///
/// All percentages are rounded to two decimal places.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Compound annual revenue growth, in percent.
    pub revenue_cagr: f64,
    /// Net income change between the two periods relative to the older one, in percent.
    pub profit_growth: f64,
    /// Latest net income over latest revenue, in percent.
    pub net_margin: f64,
    /// Revenue CAGR plus net margin. Only set under the Rule-of-40 formula.
    pub rule_of_40: Option<f64>,
    /// Latest revenue in billions of currency units.
    pub revenue_bn: f64,
}
