//! ISO 4217 precision engine.
//!
//! CRITICAL: Precision rules for money amounts:
//! - Never drop digits the caller supplied on construction
//! - Always carry at least the currency's minor-unit digits
//! - Round half away from zero, ceil/floor toward the infinities
//! - Psychological rounding produces charm prices (`23.99`, `19`)

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::code::CurrencyCode;
use crate::error::{ExchangeError, ExchangeResult};

/// Raw numeric input accepted when building an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAmount {
    /// Already a decimal.
    Decimal(Decimal),
    /// Whole number.
    Integer(i64),
    /// Textual decimal, e.g. `"23.232524"`.
    Text(String),
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RawAmount {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for RawAmount {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl RawAmount {
    fn into_decimal(self) -> ExchangeResult<Decimal> {
        match self {
            Self::Decimal(value) => Ok(value),
            Self::Integer(value) => Ok(Decimal::from(value)),
            Self::Text(text) => {
                let trimmed = text.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map_err(|_| ExchangeError::InvalidAmount(text))
            }
        }
    }
}

/// How a rounding operation picks its precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundMode {
    /// The currency's minor unit.
    #[default]
    Minor,
    /// An explicit number of decimal digits.
    Digits(u32),
    /// Charm price one minor unit below the rounded major amount.
    Psychological,
}

impl From<u32> for RoundMode {
    fn from(digits: u32) -> Self {
        Self::Digits(digits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Nearest,
    Up,
    Down,
}

impl Direction {
    const fn strategy(self) -> RoundingStrategy {
        match self {
            Self::Nearest => RoundingStrategy::MidpointAwayFromZero,
            Self::Up => RoundingStrategy::ToPositiveInfinity,
            Self::Down => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Precision and rounding rules keyed by ISO 4217 metadata.
pub struct Iso4217;

impl Iso4217 {
    /// Number of minor-unit digits of `currency`.
    #[must_use]
    pub const fn minor_unit(currency: CurrencyCode) -> u32 {
        currency.minor_unit()
    }

    /// Display symbol of `currency`.
    #[must_use]
    pub const fn symbol(currency: CurrencyCode) -> Option<&'static str> {
        currency.symbol()
    }

    /// Converts raw input into a decimal carrying
    /// `max(input digits, minor unit)` fractional digits.
    ///
    /// # Example
    ///
    /// ```
    /// use forex_core::currency::{CurrencyCode, Iso4217};
    ///
    /// let usd = CurrencyCode::parse("USD").unwrap();
    /// assert_eq!(Iso4217::instantiate("10", usd).unwrap().to_string(), "10.00");
    /// assert_eq!(Iso4217::instantiate("10.12345", usd).unwrap().to_string(), "10.12345");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if textual input is not a decimal number.
    pub fn instantiate(raw: impl Into<RawAmount>, currency: CurrencyCode) -> ExchangeResult<Decimal> {
        let mut amount = raw.into().into_decimal()?;
        let scale = amount.scale().max(currency.minor_unit());
        amount.rescale(scale);
        Ok(amount)
    }

    /// Rounds half away from zero.
    #[must_use]
    pub fn round(amount: Decimal, currency: CurrencyCode, mode: RoundMode) -> Decimal {
        Self::apply(amount, currency, mode, Direction::Nearest)
    }

    /// Rounds toward positive infinity.
    #[must_use]
    pub fn ceil(amount: Decimal, currency: CurrencyCode, mode: RoundMode) -> Decimal {
        Self::apply(amount, currency, mode, Direction::Up)
    }

    /// Rounds toward negative infinity.
    #[must_use]
    pub fn floor(amount: Decimal, currency: CurrencyCode, mode: RoundMode) -> Decimal {
        Self::apply(amount, currency, mode, Direction::Down)
    }

    fn apply(amount: Decimal, currency: CurrencyCode, mode: RoundMode, direction: Direction) -> Decimal {
        match mode {
            RoundMode::Minor => {
                amount.round_dp_with_strategy(currency.minor_unit(), direction.strategy())
            }
            RoundMode::Digits(digits) => amount.round_dp_with_strategy(digits, direction.strategy()),
            RoundMode::Psychological => Self::psychological(amount, currency.minor_unit(), direction),
        }
    }

    /// Charm pricing.
    ///
    /// With minor units the major amount is rounded and one minor unit taken
    /// off (`24 -> 23.99`). Without minor units the amount is rounded to tens
    /// and one major unit taken off (`20 -> 19`). Nearest rounding behaves
    /// as floor in this mode. Results saturate at the `Decimal` bounds.
    fn psychological(amount: Decimal, minor_unit: u32, direction: Direction) -> Decimal {
        let strategy = match direction {
            Direction::Nearest | Direction::Down => Direction::Down.strategy(),
            Direction::Up => Direction::Up.strategy(),
        };

        if minor_unit == 0 {
            let tens = (amount / Decimal::TEN)
                .round_dp_with_strategy(0, strategy)
                .saturating_mul(Decimal::TEN);
            tens.saturating_sub(Decimal::ONE)
        } else {
            amount
                .round_dp_with_strategy(0, strategy)
                .saturating_sub(Decimal::new(1, minor_unit))
        }
    }
}
