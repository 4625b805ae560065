//! Integration test for the process-wide exchange.
//!
//! Kept in its own test binary: installing replaces global state.

use std::collections::BTreeMap;

use forex_core::{Exchange, ExchangeError, Fixed, Money, RoundMode, StaticSource};
use rust_decimal_macros::dec;

#[test]
fn test_install_and_use_global_exchange() {
    // Before installation the default exchange has no sources.
    let eur = Money::new(10, "EUR").unwrap();
    assert!(matches!(eur.to("USD"), Err(ExchangeError::NoRate { .. })));
    assert!(Exchange::global().chain().is_empty());

    let rates = BTreeMap::from([("USD".to_string(), dec!(1.25)), ("SEK".to_string(), dec!(11.25))]);
    let installed = Exchange::install(
        Exchange::builder()
            .source(StaticSource::from_codes("manual", "EUR", &rates).unwrap())
            .build(),
    );
    assert_eq!(Exchange::global().chain().len(), installed.chain().len());

    // Values built before installation keep their exchange.
    assert!(eur.to("USD").is_err());

    let eur = Money::new(10, "EUR").unwrap();
    assert_eq!(eur.to("USD").unwrap().amount(), dec!(12.50));

    let zero = Money::zero("SEK").unwrap();
    assert!(zero.is_zero());
    assert_eq!(zero.try_add(&eur).unwrap().amount(), dec!(112.50));

    let fixed = Fixed::new("23.232524", "USD").unwrap();
    assert_eq!(fixed.round(RoundMode::Psychological).amount(), dec!(22.99));
    assert_eq!(fixed.to("EUR").unwrap().amount(), dec!(18.59));
}
