//! Exchange error types.
//!
//! Every failure of the currency engine surfaces as an [`ExchangeError`]. The
//! only recovery performed internally is fallback-chain advancement on
//! [`ExchangeError::SourceCommunication`] and unsupported pairs.

use forex_shared::ConfigError;
use thiserror::Error;

use crate::currency::CurrencyCode;
use crate::rates::SourceError;

/// Result type alias using `ExchangeError`.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Errors that can occur in currency operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    // ========== Currency Errors ==========
    /// A currency or country code does not resolve to an ISO 4217 entry.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Raw amount input could not be parsed as a decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // ========== Arithmetic Errors ==========
    /// Two fixed-point values of different currencies were mixed while
    /// mixed operations are disabled.
    #[error("Cannot mix {left} and {right} while mixed operations are disabled")]
    CurrencyMix {
        /// Currency of the left-hand side.
        left: CurrencyCode,
        /// Currency of the right-hand side.
        right: CurrencyCode,
    },

    /// A money operation would have converted implicitly while mixed
    /// operations are disabled.
    #[error("Implicit conversion from {from} to {to} is not allowed")]
    ImplicitConversion {
        /// Currency that would have been converted.
        from: CurrencyCode,
        /// Currency it would have been converted to.
        to: CurrencyCode,
    },

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow")]
    Overflow,

    /// Division by a zero amount.
    #[error("Division by zero")]
    DivisionByZero,

    /// A value was split into zero parts.
    #[error("Cannot split into {0} parts")]
    InvalidSplit(usize),

    /// The value carries no recorded origin to revert to.
    #[error("Cannot revert a value that has no recorded conversion origin")]
    ImpossibleReversion,

    // ========== Rate Errors ==========
    /// No source in the fallback chain supports the pair.
    #[error("No exchange rate available from {from} to {to}")]
    NoRate {
        /// Source currency.
        from: CurrencyCode,
        /// Target currency.
        to: CurrencyCode,
    },

    /// A rate source failed to deliver rates.
    #[error("Rate source communication failed: {0}")]
    SourceCommunication(#[from] SourceError),

    /// Configuration could not be turned into an exchange.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A source identifier is not registered with the exchange.
    #[error("Unknown rate source: {0}")]
    UnknownSource(String),

    // ========== Cache Errors ==========
    /// Caching was requested without a block computing the value.
    #[error("Caching requires a block computing the value")]
    CachingWithoutBlock,

    /// The cache backend failed to read or write an entry.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl ExchangeError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::CurrencyMix { .. } => "CURRENCY_MIX",
            Self::ImplicitConversion { .. } => "IMPLICIT_CONVERSION",
            Self::Overflow => "OVERFLOW",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::InvalidSplit(_) => "INVALID_SPLIT",
            Self::ImpossibleReversion => "IMPOSSIBLE_REVERSION",
            Self::NoRate { .. } => "NO_RATE",
            Self::SourceCommunication(_) => "SOURCE_COMMUNICATION",
            Self::Config(err) => err.error_code(),
            Self::UnknownSource(_) => "UNKNOWN_SOURCE",
            Self::CachingWithoutBlock => "CACHING_WITHOUT_BLOCK",
            Self::Cache(_) => "CACHE_ERROR",
        }
    }
}

impl From<std::io::Error> for ExchangeError {
    fn from(err: std::io::Error) -> Self {
        Self::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Cache(err.to_string())
    }
}
