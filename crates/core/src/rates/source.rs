//! Rate source contract and the built-in providers.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::SourceError;
use super::table::RateTable;
use crate::currency::CurrencyCode;
use crate::error::ExchangeResult;

/// Options for a rate lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateOptions {
    /// Point in time the rates should be valid at, `None` for now.
    pub at: Option<DateTime<Utc>>,
}

impl RateOptions {
    /// Options for rates valid at `at`.
    #[must_use]
    pub const fn at(at: DateTime<Utc>) -> Self {
        Self { at: Some(at) }
    }
}

/// A provider of exchange rates.
///
/// Implementations perform the transport work (network, disk, ...) in
/// [`RateSource::fetch`]; caching and fallback are handled around them.
pub trait RateSource: Send + Sync {
    /// Stable identifier, used in cache keys and logs.
    fn id(&self) -> &str;

    /// Currencies this source can quote.
    fn currencies(&self) -> &BTreeSet<CurrencyCode>;

    /// Fetches a fresh rate table.
    fn fetch(&self, options: &RateOptions) -> Result<RateTable, SourceError>;
}

/// Source serving a fixed, declared rate table.
#[derive(Debug, Clone)]
pub struct StaticSource {
    id: String,
    table: RateTable,
    currencies: BTreeSet<CurrencyCode>,
}

impl StaticSource {
    /// Creates a source serving `table`.
    pub fn new(id: impl Into<String>, table: RateTable) -> Self {
        let currencies = table.rates().keys().copied().collect();
        Self {
            id: id.into(),
            table,
            currencies,
        }
    }

    /// Builds a static source from textual codes, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` for any code not in the ISO table.
    pub fn from_codes(
        id: impl Into<String>,
        base: &str,
        rates: &BTreeMap<String, Decimal>,
    ) -> ExchangeResult<Self> {
        let base = CurrencyCode::parse(base)?;
        let rates = rates
            .iter()
            .map(|(code, rate)| Ok((CurrencyCode::parse(code)?, *rate)))
            .collect::<ExchangeResult<BTreeMap<_, _>>>()?;
        Ok(Self::new(id, RateTable::new(base, rates, Utc::now().timestamp())))
    }
}

impl RateSource for StaticSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn currencies(&self) -> &BTreeSet<CurrencyCode> {
        &self.currencies
    }

    fn fetch(&self, _options: &RateOptions) -> Result<RateTable, SourceError> {
        Ok(self.table.clone())
    }
}

/// Source reading a JSON rate table from disk.
///
/// The document has the shape
/// `{"base": "EUR", "timestamp": 1700000000, "rates": {"USD": "1.0865"}}`.
/// A `{date}` placeholder in the path is replaced by the requested day
/// (`YYYY-MM-DD`), which lets a directory of daily files serve historical
/// lookups.
#[derive(Debug, Clone)]
pub struct FileSource {
    id: String,
    path: PathBuf,
    currencies: BTreeSet<CurrencyCode>,
}

impl FileSource {
    /// Creates a file source declaring `currencies`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` for any code not in the ISO table.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, currencies: &[String]) -> ExchangeResult<Self> {
        let currencies = currencies
            .iter()
            .map(|code| CurrencyCode::parse(code))
            .collect::<ExchangeResult<BTreeSet<_>>>()?;
        Ok(Self {
            id: id.into(),
            path: path.into(),
            currencies,
        })
    }

    fn resolved_path(&self, options: &RateOptions) -> PathBuf {
        let raw = self.path.to_string_lossy();
        if !raw.contains("{date}") {
            return self.path.clone();
        }
        let day = options.at.unwrap_or_else(Utc::now).format("%Y-%m-%d").to_string();
        PathBuf::from(raw.replace("{date}", &day))
    }
}

impl RateSource for FileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn currencies(&self) -> &BTreeSet<CurrencyCode> {
        &self.currencies
    }

    fn fetch(&self, options: &RateOptions) -> Result<RateTable, SourceError> {
        let path = self.resolved_path(options);
        let body = fs::read_to_string(&path)
            .map_err(|err| SourceError::unavailable(&self.id, format!("{}: {err}", path.display())))?;
        let table: RateTable = serde_json::from_str(&body)
            .map_err(|err| SourceError::malformed(&self.id, format!("{}: {err}", path.display())))?;
        Ok(RateTable::new(table.base(), table.rates().clone(), table.timestamp()))
    }
}
