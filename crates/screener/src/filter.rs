//! Declarative filter chain over metric records.
//!
//! Predicates are conjunctive: a record survives only if every predicate
//! accepts it, so the order of the chain never changes the surviving set.

use serde::{Deserialize, Serialize};

use screener_core::MetricRecord;

/// User-facing thresholds a chain is built from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum revenue CAGR in percent, inclusive.
    pub min_revenue_cagr: f64,
    /// Keep only records whose profit growth is strictly positive.
    pub positive_profit_growth: bool,
    /// Minimum Rule of 40 score, inclusive.
    pub min_rule_of_40: Option<f64>,
    /// Maximum Rule of 40 score, inclusive. Cuts off implausible one-off spikes.
    pub max_rule_of_40: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_revenue_cagr: 5.0,
            positive_profit_growth: true,
            min_rule_of_40: None,
            max_rule_of_40: None,
        }
    }
}

impl Thresholds {
    /// Builds the filter chain these thresholds describe.
    #[must_use]
    pub fn chain(&self) -> FilterChain {
        let mut chain = FilterChain::new().with(Predicate::MinRevenueCagr(self.min_revenue_cagr));
        if self.positive_profit_growth {
            chain = chain.with(Predicate::PositiveProfitGrowth);
        }
        if let Some(min) = self.min_rule_of_40 {
            chain = chain.with(Predicate::MinRuleOf40(min));
        }
        if let Some(max) = self.max_rule_of_40 {
            chain = chain.with(Predicate::MaxRuleOf40(max));
        }
        chain
    }
}

/// Identifies a predicate regardless of its bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// See [`Predicate::MinRevenueCagr`].
    MinRevenueCagr,
    /// See [`Predicate::PositiveProfitGrowth`].
    PositiveProfitGrowth,
    /// See [`Predicate::MinRuleOf40`].
    MinRuleOf40,
    /// See [`Predicate::MaxRuleOf40`].
    MaxRuleOf40,
}

/// A single record test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Predicate {
    /// `revenue_cagr >= bound`.
    MinRevenueCagr(f64),
    /// `profit_growth > 0`.
    PositiveProfitGrowth,
    /// `rule_of_40 >= bound`; records without a score fail.
    MinRuleOf40(f64),
    /// `rule_of_40 <= bound`; records without a score fail.
    MaxRuleOf40(f64),
}

impl Predicate {
    /// Returns true if the record passes this predicate.
    #[must_use]
    pub fn matches(&self, record: &MetricRecord) -> bool {
        match *self {
            Self::MinRevenueCagr(min) => record.revenue_cagr >= min,
            Self::PositiveProfitGrowth => record.profit_growth > 0.0,
            Self::MinRuleOf40(min) => record.rule_of_40.is_some_and(|score| score >= min),
            Self::MaxRuleOf40(max) => record.rule_of_40.is_some_and(|score| score <= max),
        }
    }

    /// Returns the kind of this predicate.
    #[must_use]
    pub const fn kind(&self) -> PredicateKind {
        match self {
            Self::MinRevenueCagr(_) => PredicateKind::MinRevenueCagr,
            Self::PositiveProfitGrowth => PredicateKind::PositiveProfitGrowth,
            Self::MinRuleOf40(_) => PredicateKind::MinRuleOf40,
            Self::MaxRuleOf40(_) => PredicateKind::MaxRuleOf40,
        }
    }

    /// Short human-readable form, e.g. `revenue CAGR >= 5%`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::MinRevenueCagr(min) => format!("revenue CAGR >= {min}%"),
            Self::PositiveProfitGrowth => "profit growth > 0%".to_string(),
            Self::MinRuleOf40(min) => format!("Rule of 40 >= {min}"),
            Self::MaxRuleOf40(max) => format!("Rule of 40 <= {max}"),
        }
    }
}

/// Ordered list of predicates applied conjunctively.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain {
    predicates: Vec<Predicate>,
}

impl FilterChain {
    /// Creates an empty chain that accepts every record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Appends a predicate.
    #[must_use]
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Returns a copy of this chain with every predicate of `kind` removed.
    #[must_use]
    pub fn without(&self, kind: PredicateKind) -> Self {
        Self {
            predicates: self
                .predicates
                .iter()
                .filter(|p| p.kind() != kind)
                .copied()
                .collect(),
        }
    }

    /// Returns the predicates in the chain.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns true if the record passes every predicate.
    #[must_use]
    pub fn matches(&self, record: &MetricRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Keeps the records that pass every predicate, preserving their order.
    #[must_use]
    pub fn apply(&self, records: Vec<MetricRecord>) -> Vec<MetricRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// Joins the predicate descriptions, e.g. for a report banner.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.predicates.is_empty() {
            return "no filter".to_string();
        }
        self.predicates
            .iter()
            .map(Predicate::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
