//! Rate source error types.

use std::fmt;

use thiserror::Error;

use crate::currency::CurrencyCode;

/// Rate source error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    /// Upstream could not be reached or read.
    Unavailable,
    /// Upstream answered with something that is not a rate table.
    Malformed,
    /// The rate table lacks a currency the source claims to support.
    MissingRate,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unavailable => "unavailable",
            Self::Malformed => "malformed",
            Self::MissingRate => "missing_rate",
        };
        f.write_str(label)
    }
}

/// Transport-level failure of a single rate source.
///
/// Any `SourceError` makes the resolver move on to the next source in the
/// fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_id} {kind}: {message}")]
pub struct SourceError {
    source_id: String,
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    /// Upstream could not be reached or read.
    pub fn unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    /// Upstream payload could not be parsed.
    pub fn malformed(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    /// The rate table has no usable rate for `currency`.
    pub fn missing_rate(source_id: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            source_id: source_id.into(),
            kind: SourceErrorKind::MissingRate,
            message: format!("no rate for {currency}"),
        }
    }

    /// Identifier of the failing source.
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Failure kind.
    #[must_use]
    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    /// Human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
