//! Lightweight fixed-point currency values.
//!
//! `Fixed` carries only an amount and a currency. It has no valuation time,
//! records no origin and always resolves conversions from the start of the
//! chain. Mixing currencies while the exchange forbids it is a
//! `CurrencyMix` error.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::currency::{AllocationUtil, CurrencyCode, Format, IntoCurrency, Iso4217, RawAmount, RoundMode};
use crate::error::{ExchangeError, ExchangeResult};
use crate::exchange::Exchange;
use crate::money::{Operand, normalize};

/// Fixed-point amount in a currency.
#[derive(Clone)]
pub struct Fixed {
    amount: Decimal,
    currency: CurrencyCode,
    exchange: Arc<Exchange>,
}

impl Fixed {
    /// Value bound to the process-wide exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn new(amount: impl Into<RawAmount>, currency: impl IntoCurrency) -> ExchangeResult<Self> {
        Self::with_exchange(Exchange::global(), amount, currency)
    }

    /// Value bound to an explicit exchange.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` or `InvalidAmount`.
    pub fn with_exchange(
        exchange: Arc<Exchange>,
        amount: impl Into<RawAmount>,
        currency: impl IntoCurrency,
    ) -> ExchangeResult<Self> {
        let currency = currency.into_currency()?;
        Ok(Self {
            amount: Iso4217::instantiate(amount, currency)?,
            currency,
            exchange,
        })
    }

    fn derive(&self, amount: Decimal) -> Self {
        Self {
            amount: normalize(amount, self.currency),
            currency: self.currency,
            exchange: Arc::clone(&self.exchange),
        }
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

    /// Converts to `target` with current rates.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency`, `NoRate` or `SourceCommunication`.
    pub fn to(&self, target: impl IntoCurrency) -> ExchangeResult<Self> {
        let target = target.into_currency()?;
        let amount = self.exchange.convert(self.amount, self.currency, target, None)?;
        Ok(Self {
            amount: normalize(amount, target),
            currency: target,
            exchange: Arc::clone(&self.exchange),
        })
    }

    fn operand(&self, other: Operand<'_, Self>) -> ExchangeResult<Decimal> {
        match other {
            Operand::Number(number) => Ok(number),
            Operand::Value(value) if value.currency == self.currency => Ok(value.amount),
            Operand::Value(value) => {
                if !self.exchange.policy().allow_mixed_operations {
                    return Err(ExchangeError::CurrencyMix {
                        left: self.currency,
                        right: value.currency,
                    });
                }
                self.exchange.convert(value.amount, value.currency, self.currency, None)
            }
        }
    }

    /// Sum in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMix`, a conversion error, or `Overflow`.
    pub fn try_add<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        Ok(self.derive(self.amount.checked_add(rhs).ok_or(ExchangeError::Overflow)?))
    }

    /// Difference in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMix`, a conversion error, or `Overflow`.
    pub fn try_sub<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        Ok(self.derive(self.amount.checked_sub(rhs).ok_or(ExchangeError::Overflow)?))
    }

    /// Product in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMix`, a conversion error, or `Overflow`.
    pub fn try_mul<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        Ok(self.derive(self.amount.checked_mul(rhs).ok_or(ExchangeError::Overflow)?))
    }

    /// Quotient in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMix`, a conversion error, `DivisionByZero`, or
    /// `Overflow`.
    pub fn try_div<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        if rhs.is_zero() {
            return Err(ExchangeError::DivisionByZero);
        }
        Ok(self.derive(self.amount.checked_div(rhs).ok_or(ExchangeError::Overflow)?))
    }

    /// Rounds half away from zero.
    #[must_use]
    pub fn round(&self, mode: impl Into<RoundMode>) -> Self {
        self.derive(Iso4217::round(self.amount, self.currency, mode.into()))
    }

    /// Rounds toward positive infinity.
    #[must_use]
    pub fn ceil(&self, mode: impl Into<RoundMode>) -> Self {
        self.derive(Iso4217::ceil(self.amount, self.currency, mode.into()))
    }

    /// Rounds toward negative infinity.
    #[must_use]
    pub fn floor(&self, mode: impl Into<RoundMode>) -> Self {
        self.derive(Iso4217::floor(self.amount, self.currency, mode.into()))
    }

    /// Splits into `parts` minor-unit values summing to the rounded whole.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplit` when `parts` is zero.
    pub fn split(&self, parts: usize) -> ExchangeResult<Vec<Self>> {
        Ok(AllocationUtil::split(self.amount, parts, self.currency)?
            .into_iter()
            .map(|share| self.derive(share))
            .collect())
    }

    /// Equality after rounding both sides to the minor unit.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMix` or a conversion error.
    pub fn try_eq(&self, other: &Self) -> ExchangeResult<bool> {
        let rhs = self.operand(Operand::Value(other))?;
        Ok(Iso4217::round(self.amount, self.currency, RoundMode::Minor)
            == Iso4217::round(rhs, self.currency, RoundMode::Minor))
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
}

impl PartialEq for Fixed {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or(false)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixed")
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Format::CurrencyCode))
    }
}
