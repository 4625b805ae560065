//! Property-based tests for money values.
//!
//! - Property 1: Split parts reconstruct the rounded whole
//! - Property 2: Reverting a traced conversion restores the value

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::value::Money;
use crate::currency::RoundMode;
use crate::exchange::Exchange;
use crate::rates::StaticSource;

fn exchange() -> Arc<Exchange> {
    let rates = BTreeMap::from([
        ("USD".to_string(), dec!(1.0865)),
        ("JPY".to_string(), dec!(162.37)),
        ("KWD".to_string(), dec!(0.3342)),
    ]);
    let source = StaticSource::from_codes("manual", "EUR", &rates).unwrap();
    Arc::new(Exchange::builder().source(source).build())
}

/// Strategy to generate positive amounts (0.0001 to 10,000,000.0000).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn currency() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["EUR", "USD", "JPY", "KWD"])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 1: sum of parts equals the rounded value exactly.
    #[test]
    fn prop_split_conserves_value(
        amount in positive_amount(),
        currency in currency(),
        parts in 1usize..=40,
    ) {
        let money = exchange().money(amount, currency).unwrap();
        let shares = money.split(parts).unwrap();

        prop_assert_eq!(shares.len(), parts);
        let total: Decimal = shares.iter().map(Money::amount).sum();
        prop_assert_eq!(total, money.round(RoundMode::Minor).amount());
    }

    /// Property 2: `to(..).revert()` gives back amount, currency and time.
    #[test]
    fn prop_revert_restores_origin(
        amount in positive_amount(),
        from in currency(),
        to in currency(),
    ) {
        let money = exchange().money(amount, from).unwrap();
        let back = money.to(to).unwrap().revert();

        if from == to {
            prop_assert!(back.is_err());
        } else {
            let back = back.unwrap();
            prop_assert_eq!(back.amount(), money.amount());
            prop_assert_eq!(back.currency(), money.currency());
            prop_assert_eq!(back.valuation_time(), money.valuation_time());
        }
    }
}
