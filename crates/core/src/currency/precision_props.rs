//! Property-based tests for currency operations.
//!
//! - Property 1: Precision conservation on instantiation
//! - Property 2: Rounding lands on the minor unit
//! - Property 3: Split conservation

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::AllocationUtil;
use super::code::CurrencyCode;
use super::iso4217;
use super::precision::{Iso4217, RoundMode};

/// Strategy to generate amounts with 0 to 8 fractional digits.
fn raw_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..=8)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Strategy to generate positive amounts (0.0001 to 10,000,000.0000).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to pick any currency from the table.
fn currency() -> impl Strategy<Value = CurrencyCode> {
    let codes: Vec<&'static str> = iso4217::entries().map(|entry| entry.code).collect();
    prop::sample::select(codes).prop_map(|code| CurrencyCode::parse(code).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 1: instantiate never drops supplied digits and always
    /// carries the minor unit.
    #[test]
    fn prop_instantiate_conserves_precision(
        amount in raw_amount(),
        currency in currency(),
    ) {
        let instantiated = Iso4217::instantiate(amount, currency).unwrap();
        prop_assert_eq!(instantiated, amount);
        prop_assert!(instantiated.scale() >= amount.scale());
        prop_assert!(instantiated.scale() >= currency.minor_unit());
    }

    /// Property 2: round, ceil and floor land on the minor unit and bracket
    /// the input.
    #[test]
    fn prop_rounding_brackets_amount(
        amount in raw_amount(),
        currency in currency(),
    ) {
        let rounded = Iso4217::round(amount, currency, RoundMode::Minor);
        let ceiled = Iso4217::ceil(amount, currency, RoundMode::Minor);
        let floored = Iso4217::floor(amount, currency, RoundMode::Minor);

        prop_assert!(rounded.scale() <= currency.minor_unit());
        prop_assert!(floored <= amount && amount <= ceiled);
        prop_assert!(floored <= rounded && rounded <= ceiled);
        prop_assert!(ceiled - floored <= Decimal::new(1, currency.minor_unit()));
    }

    /// Property 3: split parts sum exactly to the rounded whole and differ
    /// by at most one minor unit.
    #[test]
    fn prop_split_conserves_total(
        amount in positive_amount(),
        parts in 1usize..50,
        currency in currency(),
    ) {
        let shares = AllocationUtil::split(amount, parts, currency).unwrap();
        prop_assert_eq!(shares.len(), parts);
        prop_assert_eq!(
            shares.iter().copied().sum::<Decimal>(),
            Iso4217::round(amount, currency, RoundMode::Minor)
        );

        let max = shares.iter().copied().max().unwrap_or_default();
        let min = shares.iter().copied().min().unwrap_or_default();
        prop_assert!(max - min <= Decimal::new(1, currency.minor_unit()));
    }
}
