//! Money comparison.
//!
//! Equality compares amounts rounded to the left-hand currency's minor
//! unit; ordering compares raw amounts. Both convert the right-hand side
//! first when currencies differ.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::value::Money;
use crate::currency::{Iso4217, RoundMode};
use crate::error::ExchangeResult;

impl Money {
    /// Equality after rounding both sides to the minor unit.
    ///
    /// # Example
    ///
    /// ```
    /// use forex_core::Money;
    ///
    /// let a = Money::new("40.001", "USD").unwrap();
    /// let b = Money::new("40.004", "USD").unwrap();
    /// assert!(a.try_eq(&b).unwrap());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ImplicitConversion` when the currencies differ and mixed
    /// operations are disabled, or any conversion error.
    pub fn try_eq(&self, other: &Self) -> ExchangeResult<bool> {
        let rhs = self.align(other)?;
        Ok(self.rounded(self.amount()) == self.rounded(rhs))
    }

    /// Ordering of raw amounts.
    ///
    /// # Errors
    ///
    /// Same as [`Money::try_eq`].
    pub fn try_cmp(&self, other: &Self) -> ExchangeResult<Ordering> {
        let rhs = self.align(other)?;
        Ok(self.amount().cmp(&rhs))
    }

    fn rounded(&self, amount: Decimal) -> Decimal {
        Iso4217::round(amount, self.currency(), RoundMode::Minor)
    }
}

/// A failed conversion compares unequal.
impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or(false)
    }
}

/// A failed conversion is unordered.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl PartialEq<Decimal> for Money {
    fn eq(&self, other: &Decimal) -> bool {
        self.rounded(self.amount()) == self.rounded(*other)
    }
}

impl PartialOrd<Decimal> for Money {
    fn partial_cmp(&self, other: &Decimal) -> Option<Ordering> {
        Some(self.amount().cmp(other))
    }
}
