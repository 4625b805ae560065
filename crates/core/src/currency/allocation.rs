//! Splitting amounts into minor-unit parts.
//!
//! The parts of a split always reconstruct the rounded whole exactly:
//! 1. Round the total to the currency's minor unit
//! 2. Round each equal share to the minor unit
//! 3. Compute the residue (total - sum of shares) in minor units
//! 4. Hand out a positive residue one unit at a time from the front,
//!    a negative residue one unit at a time from the back

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use super::code::CurrencyCode;
use super::precision::{Iso4217, RoundMode};
use crate::error::{ExchangeError, ExchangeResult};

/// Allocation utility for distributing amounts.
pub struct AllocationUtil;

impl AllocationUtil {
    /// Splits `total` into `parts` shares in `currency`.
    ///
    /// # Example
    ///
    /// ```
    /// use forex_core::currency::{AllocationUtil, CurrencyCode};
    /// use rust_decimal::Decimal;
    ///
    /// let usd = CurrencyCode::parse("USD").unwrap();
    /// let shares = AllocationUtil::split(Decimal::from(100), 3, usd).unwrap();
    /// assert_eq!(shares.iter().sum::<Decimal>(), Decimal::from(100));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplit` when `parts` is zero and `Overflow` when the
    /// rounded shares no longer fit a `Decimal`.
    pub fn split(total: Decimal, parts: usize, currency: CurrencyCode) -> ExchangeResult<Vec<Decimal>> {
        if parts == 0 {
            return Err(ExchangeError::InvalidSplit(parts));
        }

        let minor_unit = currency.minor_unit();
        let unit = Decimal::new(1, minor_unit);
        let total = Iso4217::round(total, currency, RoundMode::Minor);

        let count = Decimal::from(parts as u64);
        let share = Iso4217::round(
            total.checked_div(count).ok_or(ExchangeError::Overflow)?,
            currency,
            RoundMode::Minor,
        );
        let residue = share
            .checked_mul(count)
            .and_then(|spread| total.checked_sub(spread))
            .ok_or(ExchangeError::Overflow)?;

        // |residue| < parts * unit, so the unit count always fits.
        let units = (residue / unit)
            .round_dp_with_strategy(0, RoundingStrategy::ToZero)
            .to_i64()
            .unwrap_or(0);
        let adjusted = usize::try_from(units.unsigned_abs()).unwrap_or(0).min(parts);

        let mut shares = vec![share; parts];
        if units > 0 {
            for part in shares.iter_mut().take(adjusted) {
                *part += unit;
            }
        } else if units < 0 {
            for part in shares.iter_mut().rev().take(adjusted) {
                *part -= unit;
            }
        }

        Ok(shares)
    }
}
