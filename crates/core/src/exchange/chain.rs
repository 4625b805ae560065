//! Fallback chain resolution.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::currency::CurrencyCode;
use crate::error::{ExchangeError, ExchangeResult};
use crate::rates::{RateOptions, Source, SourceError};

/// Ordered rate sources.
///
/// Resolution walks strictly left to right from a start position and never
/// goes back to an earlier source.
#[derive(Debug, Clone, Default)]
pub struct FallbackChain {
    sources: Vec<Arc<Source>>,
}

impl FallbackChain {
    /// Creates a chain in resolution order.
    #[must_use]
    pub const fn new(sources: Vec<Arc<Source>>) -> Self {
        Self { sources }
    }

    /// Sources in resolution order.
    #[must_use]
    pub fn sources(&self) -> &[Arc<Source>] {
        &self.sources
    }

    /// Number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the chain has no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Source>> {
        self.sources.iter().find(|source| source.id() == id)
    }

    /// Converts `amount` with the first source at or after `start` that
    /// quotes both currencies and answers.
    ///
    /// Returns the converted amount and the position of the source that
    /// produced it.
    ///
    /// # Errors
    ///
    /// When every remaining source was skipped or failed: the first source
    /// failure as `SourceCommunication`, or `NoRate` if none failed. Cache
    /// and arithmetic errors propagate immediately.
    pub fn convert_from(
        &self,
        start: usize,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
        options: &RateOptions,
    ) -> ExchangeResult<(Decimal, usize)> {
        let mut first_failure: Option<SourceError> = None;

        for (position, source) in self.sources.iter().enumerate().skip(start) {
            if !source.supports_pair(from, to) {
                debug!(source = %source.id(), %from, %to, "pair not supported, trying next source");
                continue;
            }

            match source.convert(amount, from, to, options) {
                Ok(converted) => return Ok((converted, position)),
                Err(ExchangeError::SourceCommunication(err)) => {
                    warn!(source = %source.id(), error = %err, "rate source failed, falling back");
                    first_failure.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(first_failure.map_or(ExchangeError::NoRate { from, to }, ExchangeError::SourceCommunication))
    }
}
