//! Provider registry with fallback behavior.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use screener_core::{
    AnnualStatement, DataError, DataProvider, FundamentalDataProvider, Result, Symbol,
};

/// Ordered set of fundamentals providers tried in turn.
///
/// The registry is itself a [`FundamentalDataProvider`]: a fetch goes to each
/// provider in registration order until one succeeds, and the last error is
/// returned if none does.
///
/// # Example
///
/// ```rust,ignore
/// use screener::{ProviderRegistry, Symbol};
///
/// let registry = ProviderRegistry::new()
///     .with_yahoo()
///     .with_fmp("your_api_key");
///
/// let rows = registry.fetch_annual_statements(&Symbol::new("CRM")).await?;
/// ```
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn FundamentalDataProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ProviderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider after those already registered.
    pub fn register(&mut self, provider: Arc<dyn FundamentalDataProvider>) {
        debug!(provider = provider.name(), "Registering fundamental provider");
        self.providers.push(provider);
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn FundamentalDataProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Names of the registered providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Add the Yahoo Finance provider.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(self) -> Self {
        self.with_provider(Arc::new(screener_yahoo::YahooProvider::new()))
    }

    /// Add the Financial Modeling Prep provider.
    #[cfg(feature = "fmp")]
    #[must_use]
    pub fn with_fmp(self, api_key: &str) -> Self {
        self.with_provider(Arc::new(screener_fmp::FmpProvider::new(api_key)))
    }
}

impl DataProvider for ProviderRegistry {
    fn name(&self) -> &str {
        match self.providers.as_slice() {
            [only] => only.name(),
            _ => "registry",
        }
    }

    fn description(&self) -> &str {
        "Tries each registered provider in order until one succeeds"
    }
}

#[async_trait]
impl FundamentalDataProvider for ProviderRegistry {
    async fn fetch_annual_statements(&self, symbol: &Symbol) -> Result<Vec<AnnualStatement>> {
        if self.providers.is_empty() {
            return Err(DataError::ProviderNotConfigured(
                "No fundamental providers registered".to_string(),
            ));
        }

        let mut last_error = None;
        for provider in &self.providers {
            debug!(
                provider = provider.name(),
                symbol = %symbol,
                "Fetching annual statements"
            );

            match provider.fetch_annual_statements(symbol).await {
                Ok(data) => return Ok(data),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DataError::Other("All providers failed with no error".to_string())))
    }
}
