//! Growth metric formulas.
//!
//! [`compute_record`] turns a ticker's annual statements into a
//! [`MetricRecord`], or explains with a [`SkipReason`] why the ticker has no
//! meaningful record for the requested lookback.
//!
//! - Revenue CAGR: `((rev_now / rev_past) ^ (1 / years) - 1) * 100`
//! - Profit growth: `(profit_now - profit_past) / |profit_past| * 100`, zero when `profit_past == 0`
//! - Net margin: `profit_now / rev_now * 100`
//! - Rule of 40: revenue CAGR + net margin, summed before rounding

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AnnualStatement, MetricRecord, Symbol};

/// Which derived score a market profile reports alongside the growth pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formula {
    /// Revenue CAGR against net profit growth.
    #[default]
    GrowthPair,
    /// Revenue CAGR plus latest net margin.
    RuleOf40,
}

impl Formula {
    /// Name of the metric a report ranks by under this formula.
    #[must_use]
    pub const fn primary_metric(self) -> &'static str {
        match self {
            Self::GrowthPair => "Net Profit Growth (%)",
            Self::RuleOf40 => "Rule of 40",
        }
    }
}

/// Why no record was produced for a ticker.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// A zero-year lookback has no growth rate.
    #[error("lookback must be at least one year")]
    InvalidLookback,

    /// Not enough annual rows to reach back `years` periods.
    #[error("{rows} annual rows available, need more than {years}")]
    InsufficientHistory {
        /// Rows the provider returned.
        rows: usize,
        /// Requested lookback.
        years: u32,
    },

    /// CAGR is undefined unless both revenue figures are strictly positive.
    #[error("non-positive revenue (past {past}, latest {latest})")]
    NonPositiveRevenue {
        /// Revenue of the older period.
        past: f64,
        /// Revenue of the latest period.
        latest: f64,
    },

    /// The reported figures produced an infinite or NaN metric.
    #[error("metric is not finite")]
    NonFinite,
}

/// Rounds to two decimal places, ties to even.
///
/// Ties are judged on the exact decimal value of the float, so `0.125` rounds
/// to `0.12` while `2.675`, stored just below the tie, also rounds down.
/// Non-finite values and values beyond the decimal range come back unchanged.
#[must_use]
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Compound annual growth rate between two strictly positive values, in percent.
#[must_use]
pub fn cagr_pct(past: f64, now: f64, years: u32) -> f64 {
    ((now / past).powf(1.0 / f64::from(years)) - 1.0) * 100.0
}

/// Change relative to the magnitude of the base, in percent. Zero base yields zero.
///
/// Both values negative is passed through unchanged: a shrinking loss reads as
/// positive growth, a widening loss as negative.
#[must_use]
pub fn growth_pct(past: f64, now: f64) -> f64 {
    if past == 0.0 {
        0.0
    } else {
        (now - past) / past.abs() * 100.0
    }
}

/// Net income as a share of revenue, in percent. Zero revenue yields zero.
#[must_use]
pub fn margin_pct(net_income: f64, revenue: f64) -> f64 {
    if revenue == 0.0 {
        0.0
    } else {
        net_income / revenue * 100.0
    }
}

/// Derives a [`MetricRecord`] from a ticker's annual statements.
///
/// Statements may arrive in any order; they are sorted by period end before the
/// latest row and the row `years` periods before it are selected.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the lookback is zero, fewer than `years + 1`
/// rows exist, either revenue figure is not strictly positive, or a metric
/// comes out non-finite.
pub fn compute_record(
    symbol: &Symbol,
    statements: &[AnnualStatement],
    years: u32,
    formula: Formula,
) -> Result<MetricRecord, SkipReason> {
    if years == 0 {
        return Err(SkipReason::InvalidLookback);
    }

    let mut rows: Vec<&AnnualStatement> = statements.iter().collect();
    rows.sort_by_key(|s| s.period_end);

    let lookback = years as usize;
    if rows.len() <= lookback {
        return Err(SkipReason::InsufficientHistory {
            rows: rows.len(),
            years,
        });
    }

    let latest = rows[rows.len() - 1];
    let past = rows[rows.len() - 1 - lookback];

    let rev_now = latest.revenue.unwrap_or(0.0);
    let rev_past = past.revenue.unwrap_or(0.0);
    let profit_now = latest.net_income.unwrap_or(0.0);
    let profit_past = past.net_income.unwrap_or(0.0);

    // `!(x > 0)` also rejects NaN
    if !(rev_past > 0.0 && rev_now > 0.0) {
        return Err(SkipReason::NonPositiveRevenue {
            past: rev_past,
            latest: rev_now,
        });
    }

    let cagr = cagr_pct(rev_past, rev_now, years);
    let profit_growth = growth_pct(profit_past, profit_now);
    let net_margin = margin_pct(profit_now, rev_now);

    if !(cagr.is_finite() && profit_growth.is_finite() && net_margin.is_finite()) {
        return Err(SkipReason::NonFinite);
    }

    let rule_of_40 = match formula {
        Formula::GrowthPair => None,
        Formula::RuleOf40 => Some(round2(cagr + net_margin)),
    };

    Ok(MetricRecord {
        symbol: symbol.clone(),
        revenue_cagr: round2(cagr),
        profit_growth: round2(profit_growth),
        net_margin: round2(net_margin),
        rule_of_40,
        revenue_bn: round2(rev_now / 1e9),
    })
}
