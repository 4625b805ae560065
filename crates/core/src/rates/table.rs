//! Rate table snapshots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyCode;

/// Point-in-time rates relative to a base currency.
///
/// Tables are values: an update replaces the whole table, nothing mutates one
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, Decimal>,
    timestamp: i64,
}

impl RateTable {
    /// Creates a table, adding the base at rate one if absent.
    #[must_use]
    pub fn new(base: CurrencyCode, mut rates: BTreeMap<CurrencyCode, Decimal>, timestamp: i64) -> Self {
        rates.entry(base).or_insert(Decimal::ONE);
        Self {
            base,
            rates,
            timestamp,
        }
    }

    /// Base currency.
    #[must_use]
    pub const fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Rates keyed by currency, 1 base = rate currency.
    #[must_use]
    pub const fn rates(&self) -> &BTreeMap<CurrencyCode, Decimal> {
        &self.rates
    }

    /// Epoch seconds the rates were published at.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Rate of `currency` against the base.
    #[must_use]
    pub fn rate_of(&self, currency: CurrencyCode) -> Option<Decimal> {
        match self.rates.get(&currency) {
            Some(rate) => Some(*rate),
            None if currency == self.base => Some(Decimal::ONE),
            None => None,
        }
    }

    /// Cross rate `rates[to] / rates[from]`.
    ///
    /// `None` when either side is missing or `from` has a zero rate.
    #[must_use]
    pub fn cross_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Option<Decimal> {
        let from_rate = self.rate_of(from)?;
        let to_rate = self.rate_of(to)?;
        to_rate.checked_div(from_rate)
    }
}
