//! Exchange service: policies, sources and the process-wide default.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use forex_shared::{ExchangeConfig, SourceConfig};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tracing::debug;

use super::chain::FallbackChain;
use crate::cache::RateCache;
use crate::currency::{CurrencyCode, IntoCurrency, RawAmount};
use crate::error::{ExchangeError, ExchangeResult};
use crate::fixed::Fixed;
use crate::money::Money;
use crate::rates::{FileSource, RateOptions, RateSource, Source, StaticSource};

static GLOBAL: Lazy<RwLock<Arc<Exchange>>> = Lazy::new(|| RwLock::new(Arc::new(Exchange::default())));

/// Operation policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Arithmetic and comparison may convert the right-hand side implicitly.
    pub allow_mixed_operations: bool,
    /// Converted values remember what they were converted from.
    pub trace_conversions: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allow_mixed_operations: true,
            trace_conversions: true,
        }
    }
}

/// Conversion context: policies, the fallback chain and the rate cache.
///
/// Values hold an `Arc<Exchange>`; [`Exchange::global`] is the default used
/// by [`Money::new`] and [`Fixed::new`].
#[derive(Debug)]
pub struct Exchange {
    policy: Policy,
    chain: FallbackChain,
    cache: Arc<RateCache>,
}

impl Default for Exchange {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            chain: FallbackChain::default(),
            cache: Arc::new(RateCache::disabled()),
        }
    }
}

impl Exchange {
    /// Starts building an exchange.
    #[must_use]
    pub fn builder() -> ExchangeBuilder {
        ExchangeBuilder::default()
    }

    /// Builds an exchange from configuration.
    ///
    /// The chain is `source` followed by `fallback`, each resolved to its
    /// declared provider.
    ///
    /// # Errors
    ///
    /// Returns `Config` when validation fails, `UnknownSource` for a chain
    /// entry without a declaration, or `UnknownCurrency` for a declared
    /// source naming an unknown currency.
    pub fn from_config(config: &ExchangeConfig) -> ExchangeResult<Self> {
        config.validate()?;

        let mut builder = Self::builder()
            .allow_mixed_operations(config.allow_mixed_operations)
            .trace_conversions(config.trace_conversions)
            .cache(RateCache::from_config(&config.cache));

        for id in config.chain() {
            let declared = config
                .sources
                .get(id)
                .ok_or_else(|| ExchangeError::UnknownSource(id.to_string()))?;

            let provider: Arc<dyn RateSource> = match declared {
                SourceConfig::Static { base, rates } => Arc::new(StaticSource::from_codes(id, base, rates)?),
                SourceConfig::File { path, currencies } => Arc::new(FileSource::new(id, path.clone(), currencies)?),
            };
            debug!(source = %id, "rate source registered");
            builder = builder.shared_source(provider);
        }

        Ok(builder.build())
    }

    /// The installed process-wide exchange.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the process-wide exchange, returning the installed handle.
    pub fn install(exchange: Self) -> Arc<Self> {
        let exchange = Arc::new(exchange);
        *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&exchange);
        exchange
    }

    /// Operation policies.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        self.policy
    }

    /// Sources in resolution order.
    #[must_use]
    pub const fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    /// Shared rate cache.
    #[must_use]
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Source registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSource` if no source has that identifier.
    pub fn source(&self, id: &str) -> ExchangeResult<&Arc<Source>> {
        self.chain.get(id).ok_or_else(|| ExchangeError::UnknownSource(id.to_string()))
    }

    /// Converts a bare amount, walking the whole chain.
    ///
    /// Same-currency conversions return `amount` untouched.
    ///
    /// # Errors
    ///
    /// Returns `NoRate` or `SourceCommunication` when the chain is exhausted.
    pub fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
        at: Option<DateTime<Utc>>,
    ) -> ExchangeResult<Decimal> {
        if from == to {
            return Ok(amount);
        }
        let options = RateOptions { at };
        self.chain.convert_from(0, amount, from, to, &options).map(|(converted, _)| converted)
    }

    /// Money valued now, bound to this exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn money(self: &Arc<Self>, amount: impl Into<RawAmount>, currency: impl IntoCurrency) -> ExchangeResult<Money> {
        Money::with_exchange(Arc::clone(self), amount, currency, Utc::now())
    }

    /// Money valued at `at`, bound to this exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn money_at(
        self: &Arc<Self>,
        amount: impl Into<RawAmount>,
        currency: impl IntoCurrency,
        at: DateTime<Utc>,
    ) -> ExchangeResult<Money> {
        Money::with_exchange(Arc::clone(self), amount, currency, at)
    }

    /// Fixed-point value bound to this exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn fixed(self: &Arc<Self>, amount: impl Into<RawAmount>, currency: impl IntoCurrency) -> ExchangeResult<Fixed> {
        Fixed::with_exchange(Arc::clone(self), amount, currency)
    }
}

/// Builder for [`Exchange`].
#[derive(Default)]
pub struct ExchangeBuilder {
    policy: Policy,
    cache: Option<RateCache>,
    providers: Vec<Arc<dyn RateSource>>,
}

impl ExchangeBuilder {
    /// Sets the mixed-operation policy.
    #[must_use]
    pub fn allow_mixed_operations(mut self, allow: bool) -> Self {
        self.policy.allow_mixed_operations = allow;
        self
    }

    /// Sets whether conversions record their origin.
    #[must_use]
    pub fn trace_conversions(mut self, trace: bool) -> Self {
        self.policy.trace_conversions = trace;
        self
    }

    /// Sets the rate cache. Defaults to a disabled cache.
    #[must_use]
    pub fn cache(mut self, cache: RateCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Appends a provider to the chain.
    #[must_use]
    pub fn source(self, provider: impl RateSource + 'static) -> Self {
        self.shared_source(Arc::new(provider))
    }

    /// Appends a shared provider to the chain.
    #[must_use]
    pub fn shared_source(mut self, provider: Arc<dyn RateSource>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Builds the exchange, binding every provider to the cache.
    #[must_use]
    pub fn build(self) -> Exchange {
        let cache = Arc::new(self.cache.unwrap_or_else(RateCache::disabled));
        let sources = self
            .providers
            .into_iter()
            .map(|provider| Arc::new(Source::new(provider, Arc::clone(&cache))))
            .collect();

        Exchange {
            policy: self.policy,
            chain: FallbackChain::new(sources),
            cache,
        }
    }
}
