//! Money arithmetic.
//!
//! Fallible `try_*` methods accept another value or a bare number. A value
//! in a different currency is converted to the left-hand currency at its own
//! valuation time first, unless the exchange forbids mixed operations. The
//! `std::ops` impls take bare decimals only and panic on overflow like
//! `Decimal` itself.

use std::ops::{Add, Div, Mul, Neg, Sub};

use rust_decimal::Decimal;

use super::value::Money;
use crate::error::{ExchangeError, ExchangeResult};

/// Right-hand side of an operation: a value or a bare number.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a, V> {
    /// Another value, converted when its currency differs.
    Value(&'a V),
    /// A bare number, taken as-is.
    Number(Decimal),
}

impl<'a, V> From<&'a V> for Operand<'a, V> {
    fn from(value: &'a V) -> Self {
        Self::Value(value)
    }
}

impl<V> From<Decimal> for Operand<'_, V> {
    fn from(number: Decimal) -> Self {
        Self::Number(number)
    }
}

impl<V> From<i64> for Operand<'_, V> {
    fn from(number: i64) -> Self {
        Self::Number(Decimal::from(number))
    }
}

impl<V> From<i32> for Operand<'_, V> {
    fn from(number: i32) -> Self {
        Self::Number(Decimal::from(number))
    }
}

impl Money {
    /// Amount of `other` in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `ImplicitConversion` when the currencies differ and mixed
    /// operations are disabled, or any conversion error.
    pub(crate) fn align(&self, other: &Self) -> ExchangeResult<Decimal> {
        if other.currency() == self.currency() {
            return Ok(other.amount());
        }
        if !self.exchange().policy().allow_mixed_operations {
            return Err(ExchangeError::ImplicitConversion {
                from: other.currency(),
                to: self.currency(),
            });
        }
        Ok(other.to(self.currency())?.amount())
    }

    fn operand(&self, other: Operand<'_, Self>) -> ExchangeResult<Decimal> {
        match other {
            Operand::Value(value) => self.align(value),
            Operand::Number(number) => Ok(number),
        }
    }

    /// Sum in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `ImplicitConversion`, a conversion error, or `Overflow`.
    pub fn try_add<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        let amount = self.amount().checked_add(rhs).ok_or(ExchangeError::Overflow)?;
        Ok(self.derive(amount, self.traced()))
    }

    /// Difference in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `ImplicitConversion`, a conversion error, or `Overflow`.
    pub fn try_sub<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        let amount = self.amount().checked_sub(rhs).ok_or(ExchangeError::Overflow)?;
        Ok(self.derive(amount, self.traced()))
    }

    /// Product in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `ImplicitConversion`, a conversion error, or `Overflow`.
    pub fn try_mul<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        let amount = self.amount().checked_mul(rhs).ok_or(ExchangeError::Overflow)?;
        Ok(self.derive(amount, self.traced()))
    }

    /// Quotient in this value's currency.
    ///
    /// # Errors
    ///
    /// Returns `ImplicitConversion`, a conversion error, `DivisionByZero`,
    /// or `Overflow`.
    pub fn try_div<'a>(&self, other: impl Into<Operand<'a, Self>>) -> ExchangeResult<Self> {
        let rhs = self.operand(other.into())?;
        if rhs.is_zero() {
            return Err(ExchangeError::DivisionByZero);
        }
        let amount = self.amount().checked_div(rhs).ok_or(ExchangeError::Overflow)?;
        Ok(self.derive(amount, self.traced()))
    }
}

macro_rules! decimal_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<Decimal> for &Money {
            type Output = Money;

            fn $method(self, rhs: Decimal) -> Money {
                self.derive(self.amount() $op rhs, self.traced())
            }
        }

        impl $trait<Decimal> for Money {
            type Output = Money;

            fn $method(self, rhs: Decimal) -> Money {
                (&self).$method(rhs)
            }
        }
    };
}

decimal_op!(Add, add, +);
decimal_op!(Sub, sub, -);
decimal_op!(Mul, mul, *);
decimal_op!(Div, div, /);

impl Neg for &Money {
    type Output = Money;

    fn neg(self) -> Money {
        self.derive(-self.amount(), self.traced())
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        -&self
    }
}
