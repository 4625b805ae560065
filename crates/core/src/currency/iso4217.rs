//! Static ISO 4217 currency table.
//!
//! Loaded once on first access and never mutated afterwards. Every currency
//! code accepted anywhere in the crate is a key of this table.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{ExchangeError, ExchangeResult};

/// Per-currency ISO 4217 metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iso4217Entry {
    /// Alphabetic code, upper case.
    pub code: &'static str,
    /// Number of decimal digits of the minor unit.
    pub minor_unit: u32,
    /// Thousands separator, `None` disables grouping.
    pub major_separator: Option<&'static str>,
    /// Separator between integer and fractional parts.
    pub minor_separator: Option<&'static str>,
    /// Display symbol.
    pub symbol: Option<&'static str>,
}

const fn entry(
    code: &'static str,
    minor_unit: u32,
    major_separator: Option<&'static str>,
    minor_separator: Option<&'static str>,
    symbol: Option<&'static str>,
) -> Iso4217Entry {
    Iso4217Entry {
        code,
        minor_unit,
        major_separator,
        minor_separator,
        symbol,
    }
}

const COMMA: Option<&str> = Some(",");
const DOT: Option<&str> = Some(".");
const SPACE: Option<&str> = Some(" ");
const APOSTROPHE: Option<&str> = Some("'");

/// `1,234.56` style.
const fn en(code: &'static str, minor_unit: u32, symbol: &'static str) -> Iso4217Entry {
    entry(code, minor_unit, COMMA, DOT, Some(symbol))
}

/// `1.234,56` style.
const fn eu(code: &'static str, minor_unit: u32, symbol: &'static str) -> Iso4217Entry {
    entry(code, minor_unit, DOT, COMMA, Some(symbol))
}

/// `1 234,56` style.
const fn sp(code: &'static str, minor_unit: u32, symbol: &'static str) -> Iso4217Entry {
    entry(code, minor_unit, SPACE, COMMA, Some(symbol))
}

static ENTRIES: &[Iso4217Entry] = &[
    en("AED", 2, "د.إ"),
    en("AFN", 2, "؋"),
    en("ALL", 2, "L"),
    en("AMD", 2, "֏"),
    en("ANG", 2, "ƒ"),
    en("AOA", 2, "Kz"),
    eu("ARS", 2, "$"),
    en("AUD", 2, "$"),
    en("AWG", 2, "ƒ"),
    en("AZN", 2, "₼"),
    en("BAM", 2, "KM"),
    en("BBD", 2, "$"),
    en("BDT", 2, "৳"),
    sp("BGN", 2, "лв."),
    en("BHD", 3, "ب.د"),
    en("BIF", 0, "FBu"),
    en("BMD", 2, "$"),
    en("BND", 2, "$"),
    en("BOB", 2, "Bs."),
    eu("BRL", 2, "R$"),
    en("BSD", 2, "$"),
    en("BTN", 2, "Nu."),
    en("BWP", 2, "P"),
    sp("BYN", 2, "Br"),
    en("BZD", 2, "$"),
    en("CAD", 2, "$"),
    en("CDF", 2, "FC"),
    entry("CHF", 2, APOSTROPHE, DOT, Some("CHF")),
    entry("CLF", 4, None, COMMA, Some("UF")),
    eu("CLP", 0, "$"),
    en("CNY", 2, "¥"),
    eu("COP", 2, "$"),
    en("CRC", 2, "₡"),
    en("CUP", 2, "$"),
    en("CVE", 2, "$"),
    sp("CZK", 2, "Kč"),
    en("DJF", 0, "Fdj"),
    eu("DKK", 2, "kr."),
    en("DOP", 2, "$"),
    en("DZD", 2, "د.ج"),
    en("EGP", 2, "E£"),
    en("ERN", 2, "Nfk"),
    en("ETB", 2, "Br"),
    eu("EUR", 2, "€"),
    en("FJD", 2, "$"),
    en("FKP", 2, "£"),
    en("GBP", 2, "£"),
    en("GEL", 2, "₾"),
    en("GHS", 2, "₵"),
    en("GIP", 2, "£"),
    en("GMD", 2, "D"),
    en("GNF", 0, "FG"),
    en("GTQ", 2, "Q"),
    en("GYD", 2, "$"),
    en("HKD", 2, "$"),
    en("HNL", 2, "L"),
    en("HTG", 2, "G"),
    sp("HUF", 2, "Ft"),
    eu("IDR", 2, "Rp"),
    en("ILS", 2, "₪"),
    en("INR", 2, "₹"),
    en("IQD", 3, "ع.د"),
    en("IRR", 2, "﷼"),
    eu("ISK", 0, "kr."),
    en("JMD", 2, "$"),
    en("JOD", 3, "د.ا"),
    en("JPY", 0, "¥"),
    en("KES", 2, "KSh"),
    en("KGS", 2, "som"),
    en("KHR", 2, "៛"),
    en("KMF", 0, "CF"),
    en("KPW", 2, "₩"),
    en("KRW", 0, "₩"),
    en("KWD", 3, "د.ك"),
    en("KYD", 2, "$"),
    sp("KZT", 2, "₸"),
    en("LAK", 2, "₭"),
    en("LBP", 2, "ل.ل"),
    en("LKR", 2, "₨"),
    en("LRD", 2, "$"),
    en("LSL", 2, "L"),
    en("LYD", 3, "ل.د"),
    en("MAD", 2, "د.م."),
    en("MDL", 2, "L"),
    en("MGA", 2, "Ar"),
    en("MKD", 2, "ден"),
    en("MMK", 2, "K"),
    en("MNT", 2, "₮"),
    en("MOP", 2, "P"),
    en("MRU", 2, "UM"),
    en("MUR", 2, "₨"),
    en("MVR", 2, "Rf"),
    en("MWK", 2, "MK"),
    en("MXN", 2, "$"),
    en("MYR", 2, "RM"),
    en("MZN", 2, "MTn"),
    en("NAD", 2, "$"),
    en("NGN", 2, "₦"),
    en("NIO", 2, "C$"),
    sp("NOK", 2, "kr"),
    en("NPR", 2, "₨"),
    en("NZD", 2, "$"),
    en("OMR", 3, "ر.ع."),
    en("PAB", 2, "B/."),
    en("PEN", 2, "S/"),
    en("PGK", 2, "K"),
    en("PHP", 2, "₱"),
    en("PKR", 2, "₨"),
    sp("PLN", 2, "zł"),
    eu("PYG", 0, "₲"),
    en("QAR", 2, "ر.ق"),
    eu("RON", 2, "lei"),
    eu("RSD", 2, "дин."),
    sp("RUB", 2, "₽"),
    en("RWF", 0, "FRw"),
    en("SAR", 2, "ر.س"),
    en("SBD", 2, "$"),
    en("SCR", 2, "₨"),
    en("SDG", 2, "£"),
    sp("SEK", 2, "kr"),
    en("SGD", 2, "$"),
    en("SHP", 2, "£"),
    en("SLE", 2, "Le"),
    en("SOS", 2, "Sh"),
    en("SRD", 2, "$"),
    en("SSP", 2, "£"),
    en("STN", 2, "Db"),
    en("SVC", 2, "₡"),
    en("SYP", 2, "£S"),
    en("SZL", 2, "E"),
    en("THB", 2, "฿"),
    en("TJS", 2, "ЅМ"),
    en("TMT", 2, "T"),
    en("TND", 3, "د.ت"),
    en("TOP", 2, "T$"),
    eu("TRY", 2, "₺"),
    en("TTD", 2, "$"),
    en("TWD", 2, "$"),
    en("TZS", 2, "Sh"),
    sp("UAH", 2, "₴"),
    en("UGX", 0, "USh"),
    en("USD", 2, "$"),
    entry("UYI", 0, DOT, COMMA, None),
    eu("UYU", 2, "$U"),
    entry("UYW", 4, DOT, COMMA, None),
    sp("UZS", 2, "so'm"),
    eu("VES", 2, "Bs."),
    eu("VND", 0, "₫"),
    en("VUV", 0, "Vt"),
    en("WST", 2, "T"),
    sp("XAF", 0, "FCFA"),
    en("XCD", 2, "$"),
    sp("XOF", 0, "CFA"),
    sp("XPF", 0, "₣"),
    en("YER", 2, "﷼"),
    sp("ZAR", 2, "R"),
    en("ZMW", 2, "K"),
    en("ZWL", 2, "$"),
];

/// ISO 3166 alpha-2 country code to the currency it uses.
static COUNTRIES: &[(&str, &str)] = &[
    ("AD", "EUR"), ("AE", "AED"), ("AF", "AFN"), ("AL", "ALL"), ("AM", "AMD"),
    ("AO", "AOA"), ("AR", "ARS"), ("AT", "EUR"), ("AU", "AUD"), ("AZ", "AZN"),
    ("BA", "BAM"), ("BD", "BDT"), ("BE", "EUR"), ("BG", "BGN"), ("BH", "BHD"),
    ("BO", "BOB"), ("BR", "BRL"), ("BY", "BYN"), ("CA", "CAD"), ("CH", "CHF"),
    ("CL", "CLP"), ("CN", "CNY"), ("CO", "COP"), ("CR", "CRC"), ("CY", "EUR"),
    ("CZ", "CZK"), ("DE", "EUR"), ("DK", "DKK"), ("DO", "DOP"), ("DZ", "DZD"),
    ("EC", "USD"), ("EE", "EUR"), ("EG", "EGP"), ("ES", "EUR"), ("ET", "ETB"),
    ("FI", "EUR"), ("FR", "EUR"), ("GB", "GBP"), ("GE", "GEL"), ("GH", "GHS"),
    ("GR", "EUR"), ("GT", "GTQ"), ("HK", "HKD"), ("HR", "EUR"), ("HU", "HUF"),
    ("ID", "IDR"), ("IE", "EUR"), ("IL", "ILS"), ("IN", "INR"), ("IQ", "IQD"),
    ("IR", "IRR"), ("IS", "ISK"), ("IT", "EUR"), ("JM", "JMD"), ("JO", "JOD"),
    ("JP", "JPY"), ("KE", "KES"), ("KR", "KRW"), ("KW", "KWD"), ("KZ", "KZT"),
    ("LB", "LBP"), ("LI", "CHF"), ("LK", "LKR"), ("LT", "EUR"), ("LU", "EUR"),
    ("LV", "EUR"), ("LY", "LYD"), ("MA", "MAD"), ("MC", "EUR"), ("MD", "MDL"),
    ("ME", "EUR"), ("MK", "MKD"), ("MT", "EUR"), ("MX", "MXN"), ("MY", "MYR"),
    ("NG", "NGN"), ("NL", "EUR"), ("NO", "NOK"), ("NZ", "NZD"), ("OM", "OMR"),
    ("PA", "PAB"), ("PE", "PEN"), ("PH", "PHP"), ("PK", "PKR"), ("PL", "PLN"),
    ("PT", "EUR"), ("PY", "PYG"), ("QA", "QAR"), ("RO", "RON"), ("RS", "RSD"),
    ("RU", "RUB"), ("SA", "SAR"), ("SE", "SEK"), ("SG", "SGD"), ("SI", "EUR"),
    ("SK", "EUR"), ("SM", "EUR"), ("SV", "USD"), ("TH", "THB"), ("TN", "TND"),
    ("TR", "TRY"), ("TW", "TWD"), ("UA", "UAH"), ("UG", "UGX"), ("US", "USD"),
    ("UY", "UYU"), ("UZ", "UZS"), ("VA", "EUR"), ("VE", "VES"), ("VN", "VND"),
    ("ZA", "ZAR"), ("ZM", "ZMW"),
];

static TABLE: Lazy<HashMap<&'static str, &'static Iso4217Entry>> =
    Lazy::new(|| ENTRIES.iter().map(|entry| (entry.code, entry)).collect());

static COUNTRY_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COUNTRIES.iter().copied().collect());

/// Looks up the entry for an upper-case currency code.
///
/// # Errors
///
/// Returns `UnknownCurrency` if the code is not in the table.
pub fn lookup(code: &str) -> ExchangeResult<&'static Iso4217Entry> {
    TABLE
        .get(code)
        .copied()
        .ok_or_else(|| ExchangeError::UnknownCurrency(code.to_string()))
}

/// Resolves a country or currency code to a table entry.
///
/// Input is trimmed and case-insensitive. Two-letter input is treated as a
/// country code and mapped to that country's currency first.
///
/// # Errors
///
/// Returns `UnknownCurrency` carrying the raw input if nothing matches.
pub fn resolve(raw: &str) -> ExchangeResult<&'static Iso4217Entry> {
    let normalized = raw.trim().to_ascii_uppercase();
    let code = if normalized.len() == 2 {
        COUNTRY_TABLE.get(normalized.as_str()).copied()
    } else {
        Some(normalized.as_str())
    };

    code.and_then(|code| TABLE.get(code).copied())
        .ok_or_else(|| ExchangeError::UnknownCurrency(raw.to_string()))
}

/// Returns every currency in the table.
pub fn entries() -> impl Iterator<Item = &'static Iso4217Entry> {
    ENTRIES.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_currency() {
        let tnd = lookup("TND").unwrap();
        assert_eq!(tnd.minor_unit, 3);
        let clp = lookup("CLP").unwrap();
        assert_eq!(clp.minor_unit, 0);
        assert_eq!(clp.major_separator, Some("."));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(lookup("usd").is_err());
        assert!(matches!(lookup("XXX"), Err(ExchangeError::UnknownCurrency(code)) if code == "XXX"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(resolve(" usd ").unwrap().code, "USD");
        assert_eq!(resolve("Sek").unwrap().code, "SEK");
    }

    #[test]
    fn test_resolve_country_codes() {
        assert_eq!(resolve("de").unwrap().code, "EUR");
        assert_eq!(resolve("US").unwrap().code, "USD");
        assert_eq!(resolve("ch").unwrap().code, "CHF");
    }

    #[test]
    fn test_resolve_unknown_keeps_raw_input() {
        let err = resolve("zz").unwrap_err();
        assert!(matches!(err, ExchangeError::UnknownCurrency(raw) if raw == "zz"));
        assert!(resolve("").is_err());
        assert!(resolve("DOLLARS").is_err());
    }

    #[test]
    fn test_every_country_maps_to_table_entry() {
        for (country, currency) in COUNTRIES {
            assert!(
                TABLE.contains_key(currency),
                "country {country} maps to unknown currency {currency}"
            );
        }
    }

    #[test]
    fn test_codes_are_unique_and_upper_case() {
        assert_eq!(TABLE.len(), ENTRIES.len());
        for entry in entries() {
            assert_eq!(entry.code.len(), 3);
            assert_eq!(entry.code, entry.code.to_ascii_uppercase());
        }
    }
}
