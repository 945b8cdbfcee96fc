//! Market profiles and screener configuration.
//!
//! A [`MarketProfile`] bundles everything that differs between markets: the
//! exchange suffix, the embedded universes and sector maps, the formula and
//! the default thresholds. [`ScreenerConfig`] picks a profile and carries the
//! runtime knobs (lookback, cache, provider).

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use screener_core::{DataError, Formula, Result};

use crate::{
    filter::Thresholds,
    universe::{SAAS, SAAS_SECTORS, SET50, US_SECTORS, set100},
};

/// Lookback lengths, in years, a screen may use.
pub const LOOKBACK_CHOICES: [u32; 5] = [1, 3, 5, 7, 10];

/// Environment variable holding the Financial Modeling Prep API key.
pub const FMP_API_KEY_ENV: &str = "FMP_API_KEY";

/// Built-in market profiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    /// Stock Exchange of Thailand, SET50 and SET100.
    #[default]
    ThaiSet,
    /// US large caps by sector.
    UsSectors,
    /// SaaS names scored by the Rule of 40.
    RuleOf40,
}

impl ProfileKind {
    /// Every built-in profile.
    pub const ALL: [Self; 3] = [Self::ThaiSet, Self::UsSectors, Self::RuleOf40];

    /// Returns the command-line name of the profile.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThaiSet => "thai-set",
            Self::UsSectors => "us-sectors",
            Self::RuleOf40 => "rule-of-40",
        }
    }

    /// Builds the profile.
    #[must_use]
    pub fn profile(&self) -> MarketProfile {
        match self {
            Self::ThaiSet => MarketProfile::thai_set(),
            Self::UsSectors => MarketProfile::us_sectors(),
            Self::RuleOf40 => MarketProfile::rule_of_40(),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::InvalidParameter(format!("unknown profile '{s}'")))
    }
}

/// A named, fixed set of tickers, stored without market suffix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    /// Display name, matched case-insensitively.
    pub name: String,
    /// Bare exchange codes.
    pub tickers: Vec<String>,
}

impl Universe {
    /// Creates a universe from a static list.
    #[must_use]
    pub fn new(name: impl Into<String>, tickers: &[&str]) -> Self {
        Self {
            name: name.into(),
            tickers: tickers.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

/// Market-specific screening setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    /// Profile this was built from.
    pub kind: ProfileKind,
    /// Exchange qualifier appended to bare tickers, e.g. `.BK`.
    pub market_suffix: Option<String>,
    /// Named index universes.
    pub universes: Vec<Universe>,
    /// Sector map.
    pub sectors: Vec<Universe>,
    /// Score reported alongside the growth pair.
    pub formula: Formula,
    /// Thresholds used when the caller does not override them.
    pub default_thresholds: Thresholds,
    /// Lookback used when the caller does not override it.
    pub default_years: u32,
}

impl MarketProfile {
    /// Thai SET profile: SET50/SET100 with the `.BK` suffix.
    #[must_use]
    pub fn thai_set() -> Self {
        Self {
            kind: ProfileKind::ThaiSet,
            market_suffix: Some(".BK".to_string()),
            universes: vec![
                Universe::new("SET50", SET50),
                Universe::new("SET100", &set100()),
            ],
            sectors: Vec::new(),
            formula: Formula::GrowthPair,
            default_thresholds: Thresholds::default(),
            default_years: 3,
        }
    }

    /// US sector profile: suffix-free tickers grouped by sector.
    #[must_use]
    pub fn us_sectors() -> Self {
        Self {
            kind: ProfileKind::UsSectors,
            market_suffix: None,
            universes: Vec::new(),
            sectors: sector_map(US_SECTORS),
            formula: Formula::GrowthPair,
            default_thresholds: Thresholds::default(),
            default_years: 3,
        }
    }

    /// Rule of 40 profile over listed SaaS companies.
    #[must_use]
    pub fn rule_of_40() -> Self {
        Self {
            kind: ProfileKind::RuleOf40,
            market_suffix: None,
            universes: vec![Universe::new("SAAS", SAAS)],
            sectors: sector_map(SAAS_SECTORS),
            formula: Formula::RuleOf40,
            default_thresholds: Thresholds {
                min_revenue_cagr: 0.0,
                positive_profit_growth: false,
                min_rule_of_40: Some(40.0),
                max_rule_of_40: Some(200.0),
            },
            default_years: 3,
        }
    }

    /// Profile name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Looks up a universe by name, ignoring case.
    #[must_use]
    pub fn universe(&self, name: &str) -> Option<&Universe> {
        find(&self.universes, name)
    }

    /// Looks up a sector by name, ignoring case.
    #[must_use]
    pub fn sector(&self, name: &str) -> Option<&Universe> {
        find(&self.sectors, name)
    }
}

fn sector_map(sectors: &[(&str, &[&str])]) -> Vec<Universe> {
    sectors
        .iter()
        .map(|(name, tickers)| Universe::new(*name, tickers))
        .collect()
}

fn find<'a>(lists: &'a [Universe], name: &str) -> Option<&'a Universe> {
    let name = name.trim();
    lists.iter().find(|u| u.name.eq_ignore_ascii_case(name))
}

/// Which fundamentals source to query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderChoice {
    /// Yahoo Finance (no API key required).
    #[default]
    Yahoo,
    /// Financial Modeling Prep (requires an API key).
    Fmp,
    /// Yahoo first, then FMP when a key is configured.
    Auto,
}

impl FromStr for ProviderChoice {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "fmp" => Ok(Self::Fmp),
            "auto" => Ok(Self::Auto),
            other => Err(DataError::InvalidParameter(format!(
                "unknown provider '{other}'"
            ))),
        }
    }
}

/// Runtime configuration of a [`Screener`](crate::Screener).
#[derive(Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Market profile to screen.
    pub profile: ProfileKind,
    /// Lookback in years; one of [`LOOKBACK_CHOICES`].
    pub years: u32,
    /// How long computed batches stay cached.
    pub cache_ttl: Duration,
    /// Fundamentals source.
    pub provider: ProviderChoice,
    /// Financial Modeling Prep API key.
    #[serde(skip_serializing)]
    pub fmp_api_key: Option<String>,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Minimum spacing between provider requests.
    pub rate_limit: Duration,
}

impl fmt::Debug for ScreenerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenerConfig")
            .field("profile", &self.profile)
            .field("years", &self.years)
            .field("cache_ttl", &self.cache_ttl)
            .field("provider", &self.provider)
            .field("fmp_api_key", &self.fmp_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            profile: ProfileKind::ThaiSet,
            years: 3,
            cache_ttl: Duration::from_secs(3600),
            provider: ProviderChoice::Yahoo,
            fmp_api_key: None,
            request_timeout: Duration::from_secs(30),
            rate_limit: Duration::from_secs(1),
        }
    }
}

impl ScreenerConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ScreenerConfigBuilder {
        ScreenerConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !LOOKBACK_CHOICES.contains(&self.years) {
            return Err(DataError::InvalidParameter(format!(
                "lookback must be one of {LOOKBACK_CHOICES:?} years, got {}",
                self.years
            )));
        }

        if self.provider == ProviderChoice::Fmp && self.fmp_api_key.is_none() {
            return Err(DataError::InvalidParameter(format!(
                "{FMP_API_KEY_ENV} is required when using the FMP provider"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(DataError::InvalidParameter(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ScreenerConfig`].
#[derive(Debug, Default)]
pub struct ScreenerConfigBuilder {
    profile: Option<ProfileKind>,
    years: Option<u32>,
    cache_ttl: Option<Duration>,
    provider: Option<ProviderChoice>,
    fmp_api_key: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit: Option<Duration>,
}

impl ScreenerConfigBuilder {
    /// Set the market profile. Its default lookback applies unless `years` is set.
    #[must_use]
    pub const fn profile(mut self, profile: ProfileKind) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the lookback in years.
    #[must_use]
    pub const fn years(mut self, years: u32) -> Self {
        self.years = Some(years);
        self
    }

    /// Set the cache time-to-live.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the fundamentals source.
    #[must_use]
    pub const fn provider(mut self, provider: ProviderChoice) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the FMP API key.
    #[must_use]
    pub fn fmp_api_key(mut self, key: impl Into<String>) -> Self {
        self.fmp_api_key = Some(key.into());
        self
    }

    /// Set the HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the minimum spacing between provider requests.
    #[must_use]
    pub const fn rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ScreenerConfig> {
        let defaults = ScreenerConfig::default();
        let profile = self.profile.unwrap_or(defaults.profile);

        let config = ScreenerConfig {
            profile,
            years: self.years.unwrap_or_else(|| profile.profile().default_years),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            provider: self.provider.unwrap_or(defaults.provider),
            fmp_api_key: self.fmp_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit: self.rate_limit.unwrap_or(defaults.rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScreenerConfig::default();
        assert_eq!(config.profile, ProfileKind::ThaiSet);
        assert_eq!(config.years, 3);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_unsupported_lookback() {
        for years in [0, 2, 4, 11] {
            let err = ScreenerConfig::builder().years(years).build().unwrap_err();
            assert!(matches!(err, DataError::InvalidParameter(_)));
        }
        for years in LOOKBACK_CHOICES {
            assert!(ScreenerConfig::builder().years(years).build().is_ok());
        }
    }

    #[test]
    fn test_fmp_requires_api_key() {
        let err = ScreenerConfig::builder()
            .provider(ProviderChoice::Fmp)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains(FMP_API_KEY_ENV));

        let config = ScreenerConfig::builder()
            .provider(ProviderChoice::Fmp)
            .fmp_api_key("k")
            .build()
            .unwrap();
        assert_eq!(config.fmp_api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ScreenerConfig {
            fmp_api_key: Some("secret_key_12345".to_string()),
            ..Default::default()
        };
        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_profile_kind_parsing() {
        assert_eq!("thai-set".parse::<ProfileKind>().unwrap(), ProfileKind::ThaiSet);
        assert_eq!(" Rule-Of-40 ".parse::<ProfileKind>().unwrap(), ProfileKind::RuleOf40);
        assert!("nasdaq".parse::<ProfileKind>().is_err());
        for kind in ProfileKind::ALL {
            assert_eq!(kind.to_string().parse::<ProfileKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_built_in_profiles() {
        let thai = MarketProfile::thai_set();
        assert_eq!(thai.market_suffix.as_deref(), Some(".BK"));
        assert_eq!(thai.formula, Formula::GrowthPair);
        assert!(thai.universe("set100").is_some());
        assert!(thai.sectors.is_empty());

        let us = MarketProfile::us_sectors();
        assert!(us.market_suffix.is_none());
        assert!(us.sector("technology").is_some());
        assert!(us.universe("SET50").is_none());

        let saas = MarketProfile::rule_of_40();
        assert_eq!(saas.formula, Formula::RuleOf40);
        assert_eq!(saas.default_thresholds.max_rule_of_40, Some(200.0));
        assert_eq!(saas.universe("SAAS").map(|u| u.tickers.len()), Some(SAAS.len()));
    }
}
