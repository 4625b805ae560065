//! Validated currency codes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::iso4217::{self, Iso4217Entry};
use crate::error::{ExchangeError, ExchangeResult};

/// ISO 4217 currency code known to the currency table.
///
/// Construction goes through [`CurrencyCode::parse`], which accepts currency
/// codes in any case as well as ISO 3166 alpha-2 country codes. The canonical
/// form is upper case.
#[derive(Clone, Copy)]
pub struct CurrencyCode(&'static Iso4217Entry);

impl CurrencyCode {
    /// Parses and validates a currency or country code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` if the code does not resolve to a table entry.
    pub fn parse(raw: &str) -> ExchangeResult<Self> {
        iso4217::resolve(raw).map(Self)
    }

    /// Canonical upper-case code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0.code
    }

    /// ISO 4217 metadata for this currency.
    #[must_use]
    pub const fn entry(self) -> &'static Iso4217Entry {
        self.0
    }

    /// Number of digits of the minor unit.
    #[must_use]
    pub const fn minor_unit(self) -> u32 {
        self.0.minor_unit
    }

    /// Display symbol, if the currency has one.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        self.0.symbol
    }
}

impl PartialEq for CurrencyCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.code == other.0.code
    }
}

impl Eq for CurrencyCode {}

impl Hash for CurrencyCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.code.hash(state);
    }
}

impl PartialOrd for CurrencyCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CurrencyCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.code.cmp(other.0.code)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.code)
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.0.code)
    }
}

impl FromStr for CurrencyCode {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = ExchangeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.code)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Anything that names a currency: a validated code or text to parse.
pub trait IntoCurrency {
    /// Resolves to a validated code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` if the input does not resolve.
    fn into_currency(self) -> ExchangeResult<CurrencyCode>;
}

impl IntoCurrency for CurrencyCode {
    fn into_currency(self) -> ExchangeResult<CurrencyCode> {
        Ok(self)
    }
}

impl IntoCurrency for &str {
    fn into_currency(self) -> ExchangeResult<CurrencyCode> {
        CurrencyCode::parse(self)
    }
}

impl IntoCurrency for String {
    fn into_currency(self) -> ExchangeResult<CurrencyCode> {
        CurrencyCode::parse(&self)
    }
}

impl IntoCurrency for &String {
    fn into_currency(self) -> ExchangeResult<CurrencyCode> {
        CurrencyCode::parse(self)
    }
}
