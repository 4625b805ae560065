//! The `Money` value type.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::currency::{AllocationUtil, CurrencyCode, Format, IntoCurrency, Iso4217, RawAmount, RoundMode};
use crate::error::{ExchangeError, ExchangeResult};
use crate::exchange::Exchange;
use crate::rates::RateOptions;

/// An amount in a currency at a point in time.
///
/// Used as the origin of converted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
    /// Time the amount was valued at.
    pub at: DateTime<Utc>,
}

/// Currency-safe decimal amount.
///
/// Every operation returns a new value. The one piece of state that changes
/// in place is the bound source position: a conversion that had to fall back
/// rebinds the value to the source that answered, and later conversions of
/// the same value start from there. A conversion that exhausts the chain
/// leaves the binding where it was, so a failed lookup never strands the
/// value past sources that may quote other pairs.
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
    at: DateTime<Utc>,
    origin: Option<Valuation>,
    source: AtomicUsize,
    exchange: Arc<Exchange>,
}

/// Pads `amount` to at least the currency's minor unit.
pub(crate) fn normalize(mut amount: Decimal, currency: CurrencyCode) -> Decimal {
    if amount.scale() < currency.minor_unit() {
        amount.rescale(currency.minor_unit());
    }
    amount
}

impl Money {
    /// Money valued now, bound to the process-wide exchange.
    ///
    /// # Example
    ///
    /// ```
    /// use forex_core::Money;
    ///
    /// let price = Money::new("19.9", "usd").unwrap();
    /// assert_eq!(price.amount().to_string(), "19.90");
    /// assert_eq!(price.to_string(), "USD 19.90");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn new(amount: impl Into<RawAmount>, currency: impl IntoCurrency) -> ExchangeResult<Self> {
        Self::with_exchange(Exchange::global(), amount, currency, Utc::now())
    }

    /// Money valued at `at`, bound to the process-wide exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn new_at(amount: impl Into<RawAmount>, currency: impl IntoCurrency, at: DateTime<Utc>) -> ExchangeResult<Self> {
        Self::with_exchange(Exchange::global(), amount, currency, at)
    }

    /// Zero in `currency`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency`.
    pub fn zero(currency: impl IntoCurrency) -> ExchangeResult<Self> {
        Self::new(Decimal::ZERO, currency)
    }

    /// Money bound to an explicit exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn with_exchange(
        exchange: Arc<Exchange>,
        amount: impl Into<RawAmount>,
        currency: impl IntoCurrency,
        at: DateTime<Utc>,
    ) -> ExchangeResult<Self> {
        let currency = currency.into_currency()?;
        let amount = Iso4217::instantiate(amount, currency)?;
        Ok(Self {
            amount,
            currency,
            at,
            origin: None,
            source: AtomicUsize::new(0),
            exchange,
        })
    }

    /// Same currency, time and binding with a new amount.
    pub(crate) fn derive(&self, amount: Decimal, origin: Option<Valuation>) -> Self {
        Self {
            amount: normalize(amount, self.currency),
            currency: self.currency,
            at: self.at,
            origin,
            source: AtomicUsize::new(self.bound_source()),
            exchange: Arc::clone(&self.exchange),
        }
    }

    /// This value as an origin, when the exchange traces conversions.
    pub(crate) fn traced(&self) -> Option<Valuation> {
        self.exchange.policy().trace_conversions.then(|| self.valuation())
    }

    /// The amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Time the amount is valued at.
    #[must_use]
    pub const fn valuation_time(&self) -> DateTime<Utc> {
        self.at
    }

    /// What this value was derived from, if recorded.
    #[must_use]
    pub const fn origin(&self) -> Option<&Valuation> {
        self.origin.as_ref()
    }

    /// Amount, currency and time as a plain record.
    #[must_use]
    pub const fn valuation(&self) -> Valuation {
        Valuation {
            amount: self.amount,
            currency: self.currency,
            at: self.at,
        }
    }

    /// The exchange this value converts through.
    #[must_use]
    pub fn exchange(&self) -> &Arc<Exchange> {
        &self.exchange
    }

    /// Chain position conversions start from.
    #[must_use]
    pub fn bound_source(&self) -> usize {
        self.source.load(Ordering::Relaxed)
    }

    /// Rebinds the valuation time.
    #[must_use]
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }

    /// Converts to `target` at this value's valuation time.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency`, `NoRate`, or `SourceCommunication` once
    /// the chain is exhausted.
    pub fn to(&self, target: impl IntoCurrency) -> ExchangeResult<Self> {
        self.to_at(target, self.at)
    }

    /// Converts to `target` with rates valid at `at`.
    ///
    /// Converting to the own currency at the own valuation time returns an
    /// identical value without consulting any source.
    ///
    /// # Errors
    ///
    /// Same as [`Money::to`].
    pub fn to_at(&self, target: impl IntoCurrency, at: DateTime<Utc>) -> ExchangeResult<Self> {
        let target = target.into_currency()?;
        if target == self.currency {
            return Ok(self.clone().at(at));
        }

        let start = self.bound_source();
        let (amount, position) =
            self.exchange
                .chain()
                .convert_from(start, self.amount, self.currency, target, &RateOptions::at(at))?;
        self.source.store(position, Ordering::Relaxed);

        Ok(Self {
            amount: normalize(amount, target),
            currency: target,
            at,
            origin: self.traced(),
            source: AtomicUsize::new(position),
            exchange: Arc::clone(&self.exchange),
        })
    }

    /// Restores the value this one was converted from.
    ///
    /// # Errors
    ///
    /// Returns `ImpossibleReversion` when no origin was recorded.
    pub fn revert(&self) -> ExchangeResult<Self> {
        let origin = self.origin.ok_or(ExchangeError::ImpossibleReversion)?;
        Ok(Self {
            amount: origin.amount,
            currency: origin.currency,
            at: origin.at,
            origin: None,
            source: AtomicUsize::new(self.bound_source()),
            exchange: Arc::clone(&self.exchange),
        })
    }

    /// Rounds half away from zero in the value's currency.
    #[must_use]
    pub fn round(&self, mode: impl Into<RoundMode>) -> Self {
        self.derive(Iso4217::round(self.amount, self.currency, mode.into()), self.origin)
    }

    /// Rounds toward positive infinity in the value's currency.
    #[must_use]
    pub fn ceil(&self, mode: impl Into<RoundMode>) -> Self {
        self.derive(Iso4217::ceil(self.amount, self.currency, mode.into()), self.origin)
    }

    /// Rounds toward negative infinity in the value's currency.
    #[must_use]
    pub fn floor(&self, mode: impl Into<RoundMode>) -> Self {
        self.derive(Iso4217::floor(self.amount, self.currency, mode.into()), self.origin)
    }

    /// Splits into `parts` minor-unit values summing to the rounded whole.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplit` when `parts` is zero.
    pub fn split(&self, parts: usize) -> ExchangeResult<Vec<Self>> {
        Ok(AllocationUtil::split(self.amount, parts, self.currency)?
            .into_iter()
            .map(|share| self.derive(share, None))
            .collect())
    }

    /// Renders the amount in `format`.
    #[must_use]
    pub fn render(&self, format: Format) -> String {
        Iso4217::stringify(self.amount, self.currency, format)
    }

    /// Renders the amount in `format` inside a `<span>`.
    #[must_use]
    pub fn to_markup(&self, format: Format) -> String {
        Iso4217::markup(self.amount, self.currency, format)
    }

    /// Amount as a float, for display and interop only.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.amount.to_f64()
    }

    /// Whole part of the amount.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.amount.trunc().to_i64()
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        self.derive(self.amount.abs(), self.origin)
    }
}

impl Clone for Money {
    fn clone(&self) -> Self {
        Self {
            amount: self.amount,
            currency: self.currency,
            at: self.at,
            origin: self.origin,
            source: AtomicUsize::new(self.bound_source()),
            exchange: Arc::clone(&self.exchange),
        }
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Money")
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("at", &self.at)
            .field("origin", &self.origin)
            .field("source", &self.bound_source())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Format::CurrencyCode))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Money", 4)?;
        state.serialize_field("amount", &self.amount)?;
        state.serialize_field("currency", &self.currency)?;
        state.serialize_field("at", &self.at)?;
        state.serialize_field("origin", &self.origin)?;
        state.end()
    }
}
