//! Turns a user selection into an ordered, de-duplicated ticker list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use screener_core::Symbol;

use crate::profile::{MarketProfile, Universe};

/// What the user asked to screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum Selection {
    /// A named index universe, e.g. `SET50`.
    Universe(String),
    /// A named sector, e.g. `Technology`.
    Sector(String),
    /// Free-form comma-separated tickers.
    Custom(String),
}

/// Resolves selections against one market profile.
#[derive(Clone, Copy, Debug)]
pub struct TickerResolver<'a> {
    profile: &'a MarketProfile,
}

impl<'a> TickerResolver<'a> {
    /// Creates a resolver for `profile`.
    #[must_use]
    pub const fn new(profile: &'a MarketProfile) -> Self {
        Self { profile }
    }

    /// Resolves a selection to exchange-qualified symbols.
    ///
    /// Unknown universe or sector names and blank custom text resolve to an
    /// empty list. Duplicates are dropped, keeping the first occurrence.
    #[must_use]
    pub fn resolve(&self, selection: &Selection) -> Vec<Symbol> {
        match selection {
            Selection::Universe(name) => self.expand(self.profile.universe(name)),
            Selection::Sector(name) => self.expand(self.profile.sector(name)),
            Selection::Custom(text) => self.qualify(text.split(',')),
        }
    }

    /// Names of the universes the profile offers.
    #[must_use]
    pub fn universe_names(&self) -> Vec<&'a str> {
        self.profile.universes.iter().map(|u| u.name.as_str()).collect()
    }

    /// Names of the sectors the profile offers.
    #[must_use]
    pub fn sector_names(&self) -> Vec<&'a str> {
        self.profile.sectors.iter().map(|u| u.name.as_str()).collect()
    }

    fn expand(&self, list: Option<&Universe>) -> Vec<Symbol> {
        list.map(|u| self.qualify(u.tickers.iter().map(String::as_str)))
            .unwrap_or_default()
    }

    fn qualify<'t>(&self, tokens: impl Iterator<Item = &'t str>) -> Vec<Symbol> {
        let suffix = self.profile.market_suffix.as_deref().unwrap_or_default();
        let mut seen = HashSet::new();

        tokens
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Symbol::new(token).with_suffix(suffix))
            .filter(|symbol| seen.insert(symbol.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::{SET50, set100};

    fn names(symbols: &[Symbol]) -> Vec<&str> {
        symbols.iter().map(Symbol::as_str).collect()
    }

    #[test]
    fn test_custom_text_is_trimmed_and_suffixed() {
        let profile = MarketProfile::thai_set();
        let resolver = TickerResolver::new(&profile);

        let symbols = resolver.resolve(&Selection::Custom("AOT, PTT, ".to_string()));
        assert_eq!(names(&symbols), vec!["AOT.BK", "PTT.BK"]);
    }

    #[test]
    fn test_custom_text_never_double_suffixes() {
        let profile = MarketProfile::thai_set();
        let resolver = TickerResolver::new(&profile);

        let symbols = resolver.resolve(&Selection::Custom("aot.bk,PTT.Bk, cpall".to_string()));
        assert_eq!(names(&symbols), vec!["AOT.BK", "PTT.BK", "CPALL.BK"]);
    }

    #[test]
    fn test_resolving_resolved_output_is_identity() {
        let profile = MarketProfile::thai_set();
        let resolver = TickerResolver::new(&profile);

        let first = resolver.resolve(&Selection::Custom("AOT, PTT, KBANK".to_string()));
        let joined = names(&first).join(", ");
        let second = resolver.resolve(&Selection::Custom(joined));
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let profile = MarketProfile::thai_set();
        let resolver = TickerResolver::new(&profile);

        let symbols = resolver.resolve(&Selection::Custom("PTT, AOT, ptt.bk, AOT".to_string()));
        assert_eq!(names(&symbols), vec!["PTT.BK", "AOT.BK"]);
    }

    #[test]
    fn test_blank_input_resolves_to_nothing() {
        let profile = MarketProfile::thai_set();
        let resolver = TickerResolver::new(&profile);

        for text in ["", "   ", ", ,,", "\t,\n"] {
            assert!(resolver.resolve(&Selection::Custom(text.to_string())).is_empty());
        }
    }

    #[test]
    fn test_universe_lookup() {
        let profile = MarketProfile::thai_set();
        let resolver = TickerResolver::new(&profile);

        let set50 = resolver.resolve(&Selection::Universe("set50".to_string()));
        assert_eq!(set50.len(), SET50.len());
        assert!(set50.iter().all(|s| s.has_suffix(".BK")));

        let wide = resolver.resolve(&Selection::Universe("SET100".to_string()));
        assert_eq!(wide.len(), set100().len());
        assert!(set50.iter().all(|s| wide.contains(s)));

        assert!(resolver.resolve(&Selection::Universe("MAI".to_string())).is_empty());
    }

    #[test]
    fn test_sector_lookup_without_suffix() {
        let profile = MarketProfile::us_sectors();
        let resolver = TickerResolver::new(&profile);

        let tech = resolver.resolve(&Selection::Sector("Technology".to_string()));
        assert_eq!(tech.first().map(Symbol::as_str), Some("AAPL"));
        assert!(tech.iter().all(|s| !s.as_str().contains('.')));

        assert!(resolver.resolve(&Selection::Sector("Crypto".to_string())).is_empty());
        let custom = resolver.resolve(&Selection::Custom("msft, nvda".to_string()));
        assert_eq!(names(&custom), vec!["MSFT", "NVDA"]);
    }

    #[test]
    fn test_listing_names() {
        let profile = MarketProfile::rule_of_40();
        let resolver = TickerResolver::new(&profile);

        assert_eq!(resolver.universe_names(), vec!["SAAS"]);
        assert!(resolver.sector_names().contains(&"Security"));
    }
}
