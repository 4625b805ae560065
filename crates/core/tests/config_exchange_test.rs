//! Integration tests for configuration-driven exchanges.
//!
//! Loads TOML configuration from a scratch directory, builds the exchange
//! through `Exchange::from_config` and checks policies, sources and caching.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use forex_core::{Exchange, ExchangeError, Format};
use forex_shared::ExchangeConfig;
use rust_decimal_macros::dec;

fn write_config(dir: &Path, body: &str) {
    fs::write(dir.join("default.toml"), body).unwrap();
}

fn write_rates(path: &Path, base: &str, timestamp: i64, rates: &str) {
    fs::write(
        path,
        format!(r#"{{"base":"{base}","timestamp":{timestamp},"rates":{{{rates}}}}}"#),
    )
    .unwrap();
}

// ============================================================================
// Test 1: Static primary with file fallback
// ============================================================================
#[test]
fn test_static_primary_with_file_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let rates_path = dir.path().join("nordic.json");
    write_rates(&rates_path, "EUR", 1_700_000_000, r#""NOK":"11.5","SEK":"11.25""#);

    write_config(
        dir.path(),
        &format!(
            r#"
source = "manual"
fallback = ["nordic"]

[cache.backend]
type = "disabled"

[sources.manual]
kind = "static"
base = "EUR"
rates = {{ USD = "1.25" }}

[sources.nordic]
kind = "file"
path = "{}"
currencies = ["EUR", "NOK", "SEK"]
"#,
            rates_path.display()
        ),
    );

    let config = ExchangeConfig::load_from(dir.path(), "test").unwrap();
    let exchange = Arc::new(Exchange::from_config(&config).unwrap());

    let eur = exchange.money(10, "EUR").unwrap();
    assert_eq!(eur.to("USD").unwrap().amount(), dec!(12.50));

    let nok = exchange.money(20, "NOK").unwrap();
    let sek = nok.to("SEK").unwrap();
    assert_eq!(sek.amount(), dec!(19.57));
    assert_eq!(sek.render(Format::CurrencyCode), "SEK 19,57");
    assert_eq!(nok.bound_source(), 1);

    let source = exchange.source("nordic").unwrap();
    assert_eq!(source.timestamp(), Some(1_700_000_000));
    assert_eq!(source.base().map(|code| code.as_str()), Some("EUR"));
}

// ============================================================================
// Test 2: Mixing disabled in configuration
// ============================================================================
#[test]
fn test_mixing_policy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
source = "manual"
allow_mixed_operations = false

[sources.manual]
kind = "static"
base = "EUR"
rates = { NOK = "11.5", SEK = "11.25" }
"#,
    );

    let config = ExchangeConfig::load_from(dir.path(), "test").unwrap();
    let exchange = Arc::new(Exchange::from_config(&config).unwrap());

    let nok = exchange.money(20, "NOK").unwrap();
    let sek = exchange.money(20, "SEK").unwrap();
    assert!(matches!(nok.try_add(&sek), Err(ExchangeError::ImplicitConversion { .. })));
    assert_eq!(nok.try_add(&nok).unwrap().amount(), dec!(40.00));

    let nok_fixed = exchange.fixed(20, "NOK").unwrap();
    let sek_fixed = exchange.fixed(20, "SEK").unwrap();
    assert!(matches!(nok_fixed.try_add(&sek_fixed), Err(ExchangeError::CurrencyMix { .. })));
}

// ============================================================================
// Test 3: Tracing disabled in configuration
// ============================================================================
#[test]
fn test_revert_follows_tracing_policy() {
    let dir = tempfile::tempdir().unwrap();
    let body = r#"
source = "manual"
trace_conversions = TRACE

[sources.manual]
kind = "static"
base = "EUR"
rates = { USD = "1.0865" }
"#;

    write_config(dir.path(), &body.replace("TRACE", "true"));
    let traced = Arc::new(Exchange::from_config(&ExchangeConfig::load_from(dir.path(), "test").unwrap()).unwrap());
    let eur = traced.money("99.99", "EUR").unwrap();
    let back = eur.to("USD").unwrap().revert().unwrap();
    assert_eq!(back.amount(), eur.amount());
    assert_eq!(back.currency(), eur.currency());

    write_config(dir.path(), &body.replace("TRACE", "false"));
    let untraced = Arc::new(Exchange::from_config(&ExchangeConfig::load_from(dir.path(), "test").unwrap()).unwrap());
    let usd = untraced.money("99.99", "EUR").unwrap().to("USD").unwrap();
    assert!(usd.origin().is_none());
    assert!(matches!(usd.revert(), Err(ExchangeError::ImpossibleReversion)));
}

// ============================================================================
// Test 4: File cache serves later updates without reading the source again
// ============================================================================
#[test]
fn test_file_cache_memoizes_updates() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let rates_path = dir.path().join("rates.json");
    write_rates(&rates_path, "USD", 1_700_000_000, r#""EUR":"0.8""#);

    write_config(
        dir.path(),
        &format!(
            r#"
source = "disk"

[cache]
expiry = "hourly"
namespace = "test"

[cache.backend]
type = "file"
dir = "{}"

[sources.disk]
kind = "file"
path = "{}"
currencies = ["USD", "EUR"]
"#,
            cache_dir.display(),
            rates_path.display()
        ),
    );

    let config = ExchangeConfig::load_from(dir.path(), "test").unwrap();
    let exchange = Arc::new(Exchange::from_config(&config).unwrap());

    let usd = exchange.money(10, "USD").unwrap();
    assert_eq!(usd.to("EUR").unwrap().amount(), dec!(8.00));
    assert_eq!(fs::read_dir(cache_dir.join("test")).unwrap().count(), 1);

    // The source document disappears; the cached table still answers.
    fs::remove_file(&rates_path).unwrap();
    assert_eq!(usd.to("EUR").unwrap().amount(), dec!(8.00));

    // Without the cache entry the source failure surfaces.
    exchange.cache().invalidate_all().unwrap();
    assert!(matches!(usd.to("EUR"), Err(ExchangeError::SourceCommunication(_))));
}

// ============================================================================
// Test 5: Undeclared sources are rejected before building
// ============================================================================
#[test]
fn test_undeclared_fallback_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
source = "manual"
fallback = ["ecb"]

[sources.manual]
kind = "static"
base = "EUR"
rates = { USD = "1.1" }
"#,
    );

    let err = ExchangeConfig::load_from(dir.path(), "test").unwrap_err();
    assert_eq!(err.error_code(), "UNDECLARED_SOURCE");
}
