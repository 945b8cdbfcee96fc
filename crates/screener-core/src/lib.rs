#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/growth-screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the growth screener.
//!
//! - [`FundamentalDataProvider`](provider::FundamentalDataProvider) - Annual statement source
//! - [`MetricCache`](cache::MetricCache) - Memoization of computed batches
//! - [`ProgressObserver`](progress::ProgressObserver) - Batch progress side channel
//! - [`compute_record`](metrics::compute_record) - Per-ticker metric derivation

/// Cache trait and request key.
pub mod cache;
/// Error types for data operations.
pub mod error;
/// Growth metric formulas.
pub mod metrics;
/// Progress observer trait.
pub mod progress;
/// Provider traits for fetching financial statements.
pub mod provider;
/// Core data types (Symbol, AnnualStatement, MetricRecord).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{MetricCache, RequestKey};
pub use error::{DataError, Result};
pub use metrics::{Formula, SkipReason, compute_record, round2};
pub use progress::{NoProgress, ProgressObserver};
pub use provider::{DataProvider, FundamentalDataProvider};
pub use types::{AnnualStatement, MetricRecord, Symbol};
