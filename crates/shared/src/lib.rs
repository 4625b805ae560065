//! Shared configuration for Forex.
//!
//! This crate provides the configuration consumed by the core crate and the
//! command line front end:
//! - Exchange configuration (selected source, fallbacks, policies)
//! - Rate source and cache declarations
//! - Configuration errors

pub mod config;
pub mod error;

pub use config::{CacheBackendConfig, CacheConfig, CacheExpiry, ExchangeConfig, SourceConfig};
pub use error::ConfigError;
