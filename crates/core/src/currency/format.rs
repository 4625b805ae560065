//! Currency-aware rendering of amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::code::CurrencyCode;
use super::precision::{Iso4217, RoundMode};

/// Rendering mode for amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Unformatted amount, no grouping, `.` as decimal point.
    Plain,
    /// Grouped amount using the currency's separators.
    #[default]
    Amount,
    /// Grouped amount prefixed with the currency symbol.
    Symbol,
    /// Grouped amount prefixed with the ISO code.
    CurrencyCode,
}

impl Iso4217 {
    /// Renders `amount` rounded to the currency's minor unit.
    ///
    /// Falls back to the ISO code prefix when `Format::Symbol` is requested
    /// for a currency without a symbol.
    ///
    /// # Example
    ///
    /// ```
    /// use forex_core::currency::{CurrencyCode, Format, Iso4217};
    /// use rust_decimal::Decimal;
    ///
    /// let usd = CurrencyCode::parse("USD").unwrap();
    /// let amount = Decimal::new(123456789, 2);
    /// assert_eq!(Iso4217::stringify(amount, usd, Format::Symbol), "$1,234,567.89");
    /// assert_eq!(Iso4217::stringify(amount, usd, Format::Plain), "1234567.89");
    /// ```
    #[must_use]
    pub fn stringify(amount: Decimal, currency: CurrencyCode, format: Format) -> String {
        let mut rounded = Iso4217::round(amount, currency, RoundMode::Minor);
        rounded.rescale(currency.minor_unit());
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }

        if format == Format::Plain {
            return rounded.to_string();
        }

        let entry = currency.entry();
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        let digits = rounded.abs().to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut body = group(integer, entry.major_separator);
        if let Some(fraction) = fraction {
            body.push_str(entry.minor_separator.unwrap_or("."));
            body.push_str(fraction);
        }

        match (format, entry.symbol) {
            (Format::Symbol, Some(symbol)) => format!("{sign}{symbol}{body}"),
            (Format::Symbol | Format::CurrencyCode, _) => format!("{currency} {sign}{body}"),
            _ => format!("{sign}{body}"),
        }
    }

    /// Renders `amount` wrapped in a `<span>` tagged with the currency.
    #[must_use]
    pub fn markup(amount: Decimal, currency: CurrencyCode, format: Format) -> String {
        format!(
            "<span class=\"money {}\">{}</span>",
            currency.as_str().to_ascii_lowercase(),
            escape(&Self::stringify(amount, currency, format))
        )
    }
}

/// Inserts `separator` every three digits counted from the right.
fn group(integer: &str, separator: Option<&str>) -> String {
    let Some(separator) = separator else {
        return integer.to_string();
    };

    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::parse(raw).unwrap()
    }

    #[test]
    fn test_grouping() {
        assert_eq!(group("1", Some(",")), "1");
        assert_eq!(group("123", Some(",")), "123");
        assert_eq!(group("1234", Some(",")), "1,234");
        assert_eq!(group("1234567", Some(" ")), "1 234 567");
        assert_eq!(group("1234567", None), "1234567");
    }

    #[test]
    fn test_stringify_formats() {
        let usd = code("USD");
        let amount = dec!(1234567.891);
        assert_eq!(Iso4217::stringify(amount, usd, Format::Plain), "1234567.89");
        assert_eq!(Iso4217::stringify(amount, usd, Format::Amount), "1,234,567.89");
        assert_eq!(Iso4217::stringify(amount, usd, Format::Symbol), "$1,234,567.89");
        assert_eq!(Iso4217::stringify(amount, usd, Format::CurrencyCode), "USD 1,234,567.89");
    }

    #[test]
    fn test_stringify_uses_currency_separators() {
        assert_eq!(Iso4217::stringify(dec!(1234.5), code("EUR"), Format::Symbol), "€1.234,50");
        assert_eq!(Iso4217::stringify(dec!(1234.5), code("CHF"), Format::Amount), "1'234.50");
        assert_eq!(Iso4217::stringify(dec!(1234.5), code("SEK"), Format::Amount), "1 234,50");
    }

    #[test]
    fn test_stringify_zero_minor_unit_has_no_fraction() {
        assert_eq!(Iso4217::stringify(dec!(1234567.6), code("CLP"), Format::Amount), "1.234.568");
        assert_eq!(Iso4217::stringify(dec!(1500), code("JPY"), Format::Symbol), "¥1,500");
    }

    #[test]
    fn test_stringify_pads_minor_unit() {
        assert_eq!(Iso4217::stringify(dec!(5), code("KWD"), Format::CurrencyCode), "KWD 5.000");
        assert_eq!(Iso4217::stringify(dec!(5), code("USD"), Format::Plain), "5.00");
    }

    #[test]
    fn test_stringify_negative_amounts() {
        assert_eq!(Iso4217::stringify(dec!(-1234.5), code("USD"), Format::Symbol), "-$1,234.50");
        assert_eq!(Iso4217::stringify(dec!(-1234.5), code("USD"), Format::CurrencyCode), "USD -1,234.50");
        assert_eq!(Iso4217::stringify(dec!(-0.001), code("USD"), Format::Amount), "0.00");
    }

    #[test]
    fn test_symbol_falls_back_to_code() {
        assert_eq!(Iso4217::stringify(dec!(10), code("UYI"), Format::Symbol), "UYI 10");
    }

    #[test]
    fn test_markup_wraps_and_escapes() {
        assert_eq!(
            Iso4217::markup(dec!(10), code("USD"), Format::Symbol),
            "<span class=\"money usd\">$10.00</span>"
        );
        assert_eq!(
            Iso4217::markup(dec!(10), code("UZS"), Format::Symbol),
            "<span class=\"money uzs\">so&#39;m10,00</span>"
        );
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_json::to_string(&Format::CurrencyCode).unwrap(), "\"currency-code\"");
        let plain: Format = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(plain, Format::Plain);
    }
}
