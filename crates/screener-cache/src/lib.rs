#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/growth-screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for computed metric batches.
//!
//! This crate provides implementations of the [`MetricCache`] trait from `screener-core`:
//!
//! - [`InMemoryCache`] - In-process cache with a time-to-live
//! - [`NoopCache`] - No-op cache that doesn't store anything

/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use screener_core::MetricCache;

// Re-export implementations
pub use memory::{DEFAULT_TTL, InMemoryCache};
pub use noop::NoopCache;
