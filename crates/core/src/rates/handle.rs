//! Live rate source handle.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::error::SourceError;
use super::source::{RateOptions, RateSource};
use super::table::RateTable;
use crate::cache::RateCache;
use crate::currency::CurrencyCode;
use crate::error::{ExchangeError, ExchangeResult};

/// Decimal places of [`Source::convert`] results.
pub const API_CONVERT_DP: u32 = 2;

/// A rate provider bound to a cache and its latest rate table.
///
/// `update` swaps the whole snapshot at once, so `base`, `rates` and
/// `timestamp` always come from the same table.
pub struct Source {
    provider: Arc<dyn RateSource>,
    cache: Arc<RateCache>,
    snapshot: RwLock<Option<Arc<RateTable>>>,
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.provider.id())
            .field("currencies", self.provider.currencies())
            .finish_non_exhaustive()
    }
}

impl Source {
    /// Binds `provider` to `cache`.
    pub fn new(provider: Arc<dyn RateSource>, cache: Arc<RateCache>) -> Self {
        Self {
            provider,
            cache,
            snapshot: RwLock::new(None),
        }
    }

    /// Provider identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.provider.id()
    }

    /// Currencies the provider quotes.
    #[must_use]
    pub fn currencies(&self) -> &BTreeSet<CurrencyCode> {
        self.provider.currencies()
    }

    /// Whether the provider quotes `currency`.
    #[must_use]
    pub fn supports(&self, currency: CurrencyCode) -> bool {
        self.provider.currencies().contains(&currency)
    }

    /// Whether both sides of a pair are quoted.
    #[must_use]
    pub fn supports_pair(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        self.supports(from) && self.supports(to)
    }

    /// Refreshes the snapshot through the cache.
    ///
    /// # Errors
    ///
    /// Returns `SourceCommunication` when the provider fails and `Cache`
    /// when the cache backend does.
    pub fn update(&self, options: &RateOptions) -> ExchangeResult<Arc<RateTable>> {
        let at = options.at.unwrap_or_else(Utc::now);
        let key = self.cache.key(self.provider.id(), at);
        let provider = Arc::clone(&self.provider);

        let table: RateTable = self.cache.cached(
            &key,
            Some(move || provider.fetch(options).map_err(ExchangeError::from)),
        )?;
        debug!(source = %self.id(), base = %table.base(), timestamp = table.timestamp(), "rates updated");

        let table = Arc::new(table);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Latest snapshot, if `update` ran.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<RateTable>> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Base currency of the latest snapshot.
    #[must_use]
    pub fn base(&self) -> Option<CurrencyCode> {
        self.snapshot().map(|table| table.base())
    }

    /// Rates of the latest snapshot.
    #[must_use]
    pub fn rates(&self) -> Option<BTreeMap<CurrencyCode, Decimal>> {
        self.snapshot().map(|table| table.rates().clone())
    }

    /// Timestamp of the latest snapshot.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        self.snapshot().map(|table| table.timestamp())
    }

    /// Cross rate `rates[to] / rates[from]` after an update.
    ///
    /// # Errors
    ///
    /// Returns `SourceCommunication` when the update fails or the table
    /// lacks a usable rate for either side.
    pub fn rate(&self, from: CurrencyCode, to: CurrencyCode, options: &RateOptions) -> ExchangeResult<Decimal> {
        let table = self.update(options)?;
        table.cross_rate(from, to).ok_or_else(|| {
            let missing = if table.rate_of(to).is_none() { to } else { from };
            SourceError::missing_rate(self.id(), missing).into()
        })
    }

    /// Converts `amount`, rounded half away from zero to two decimal places.
    ///
    /// # Errors
    ///
    /// Same as [`Source::rate`], plus `Overflow`.
    pub fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
        options: &RateOptions,
    ) -> ExchangeResult<Decimal> {
        let rate = self.rate(from, to, options)?;
        let converted = amount.checked_mul(rate).ok_or(ExchangeError::Overflow)?;
        Ok(converted.round_dp_with_strategy(API_CONVERT_DP, RoundingStrategy::MidpointAwayFromZero))
    }
}
