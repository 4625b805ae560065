//! Cache keys for rate tables.

use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};
use forex_shared::CacheExpiry;

/// Deterministic key for "rates of a source valid at a time".
///
/// Renders as `namespace:source:year:ordinal[:hour][:suffix]`; the hour is
/// present only for hourly expiry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: String,
    source: String,
    year: i32,
    ordinal: u32,
    hour: Option<u32>,
    suffix: Option<String>,
}

impl CacheKey {
    /// Key for `source` rates valid at `at` under `expiry`.
    pub fn new(
        namespace: impl Into<String>,
        source: impl Into<String>,
        at: DateTime<Utc>,
        expiry: CacheExpiry,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            source: source.into(),
            year: at.year(),
            ordinal: at.ordinal(),
            hour: match expiry {
                CacheExpiry::Daily => None,
                CacheExpiry::Hourly => Some(at.hour()),
            },
            suffix: None,
        }
    }

    /// Adds a disambiguating suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Source identifier part of the key.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.namespace, self.source, self.year, self.ordinal)?;
        if let Some(hour) = self.hour {
            write!(f, ":{hour}")?;
        }
        if let Some(suffix) = &self.suffix {
            write!(f, ":{suffix}")?;
        }
        Ok(())
    }
}
