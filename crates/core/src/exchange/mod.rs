//! Resolution glue between values and rate sources.
//!
//! - `chain` - Ordered fallback resolution over rate sources
//! - `service` - The `Exchange` context, its builder and the process-wide default

pub mod chain;
pub mod service;

pub use chain::FallbackChain;
pub use service::{Exchange, ExchangeBuilder, Policy};
