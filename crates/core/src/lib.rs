//! Core currency logic for Forex.
//!
//! This crate contains the currency engine with ZERO network dependencies.
//! Rate transports plug in through the [`RateSource`] trait; everything else,
//! from ISO 4217 precision to fallback resolution, lives here.
//!
//! # Modules
//!
//! - `currency` - ISO 4217 table, precision engine, rendering and splitting
//! - `money` - The `Money` value type with arithmetic and comparison
//! - `fixed` - The lighter `Fixed` value type
//! - `rates` - Rate sources, rate tables and the live source handle
//! - `cache` - Rate table cache keys and backends
//! - `exchange` - Policies, fallback chain and the process-wide exchange
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use forex_core::{Exchange, StaticSource};
//! use rust_decimal::Decimal;
//!
//! let rates = BTreeMap::from([("USD".to_string(), Decimal::new(125, 2))]);
//! let exchange = Arc::new(
//!     Exchange::builder()
//!         .source(StaticSource::from_codes("manual", "EUR", &rates).unwrap())
//!         .build(),
//! );
//!
//! let eur = exchange.money(10, "EUR").unwrap();
//! let usd = eur.to("USD").unwrap();
//! assert_eq!(usd.to_string(), "USD 12.50");
//! assert_eq!(usd.revert().unwrap().amount(), eur.amount());
//! ```

pub mod cache;
pub mod currency;
pub mod error;
pub mod exchange;
pub mod fixed;
pub mod money;
pub mod rates;

pub use cache::{CacheKey, RateCache};
pub use currency::{CurrencyCode, Format, IntoCurrency, Iso4217, RawAmount, RoundMode};
pub use error::{ExchangeError, ExchangeResult};
pub use exchange::{Exchange, ExchangeBuilder, FallbackChain, Policy};
pub use fixed::Fixed;
pub use money::{Money, Operand, Valuation};
pub use rates::{FileSource, RateOptions, RateSource, RateTable, Source, SourceError, SourceErrorKind, StaticSource};
