#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/growth-screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Revenue growth screener.
//!
//! This crate ties the pieces together: a [`MarketProfile`] says which
//! tickers exist and how to score them, the [`TickerResolver`] turns a
//! [`Selection`] into symbols, the [`MetricEngine`] fetches and derives
//! metrics through a [`ProviderRegistry`], and a [`FilterChain`] keeps the
//! records that pass. [`Screener`] runs all of it and classifies the result
//! as a [`ScreenOutcome`].
//!
//! # Features
//!
//! - `yahoo` - Yahoo Finance fundamentals-timeseries provider
//! - `fmp` - Financial Modeling Prep provider
//!
//! # Example
//!
//! ```rust,ignore
//! use screener::{NoProgress, ScreenOutcome, ScreenerConfig, Screener, Selection};
//!
//! #[tokio::main]
//! async fn main() -> screener::Result<()> {
//!     let config = ScreenerConfig::builder().years(3).build()?;
//!     let screener = Screener::from_config(&config)?;
//!     let thresholds = screener.profile().default_thresholds.clone();
//!
//!     let outcome = screener
//!         .run(&Selection::Universe("SET50".into()), &thresholds, &NoProgress)
//!         .await;
//!     if let ScreenOutcome::Matches(report) = outcome {
//!         println!("{}", report.to_frame()?);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use screener_core::*;

// Cache implementations
pub use screener_cache::{InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "fmp")]
pub use screener_fmp::FmpProvider;
#[cfg(feature = "yahoo")]
pub use screener_yahoo::YahooProvider;

pub mod engine;
pub mod filter;
pub mod profile;
mod registry;
pub mod resolver;
pub mod screen;
pub mod universe;

#[cfg(test)]
mod testing;

pub use engine::MetricEngine;
pub use filter::{FilterChain, Predicate, PredicateKind, Thresholds};
pub use profile::{
    LOOKBACK_CHOICES, MarketProfile, ProfileKind, ProviderChoice, ScreenerConfig,
    ScreenerConfigBuilder, Universe,
};
pub use registry::ProviderRegistry;
pub use resolver::{Selection, TickerResolver};
pub use screen::{ScreenOutcome, ScreenReport, Screener};
