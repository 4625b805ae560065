//! CLI argument definitions for Forex.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `convert` | Convert an amount through the configured source chain |
//! | `round` | Round an amount by its currency's ISO 4217 rules |
//! | `split` | Split an amount into parts that sum to the whole |
//! | `format` | Render an amount |
//! | `sources` | List the configured source chain |
//!
//! # Examples
//!
//! ```bash
//! forex convert 100 EUR USD --iso
//! forex round 23.232524 SAR --direction up --psychological
//! forex split 100 USD 3
//! forex format 1234567.891 NOK --style symbol --markup
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use forex_core::{Format, RoundMode};

/// Currency conversion and ISO 4217 arithmetic.
#[derive(Debug, Parser)]
#[command(name = "forex", author, version, about = "Currency conversion and ISO 4217 arithmetic")]
pub struct Cli {
    /// Directory holding `default.toml` and `{RUN_MODE}.toml`.
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert an amount between currencies.
    Convert(ConvertArgs),
    /// Round an amount in a currency.
    Round(RoundArgs),
    /// Split an amount into equal minor-unit parts.
    Split(SplitArgs),
    /// Render an amount.
    Format(FormatArgs),
    /// List the configured source chain.
    Sources,
}

/// Arguments of `convert`.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Amount, e.g. `19.99`.
    pub amount: String,
    /// Source currency or country code.
    pub from: String,
    /// Target currency or country code.
    pub to: String,
    /// Value the amount at this RFC 3339 time instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
    /// Round the result to the target currency's minor unit.
    #[arg(long, default_value_t = false)]
    pub iso: bool,
    /// Output style.
    #[arg(long, value_enum, default_value_t = Style::CurrencyCode)]
    pub style: Style,
}

/// Arguments of `round`.
#[derive(Debug, Args)]
pub struct RoundArgs {
    /// Amount to round.
    pub amount: String,
    /// Currency or country code.
    pub currency: String,
    /// Rounding direction.
    #[arg(long, value_enum, default_value_t = Direction::Nearest)]
    pub direction: Direction,
    /// Explicit number of decimal digits.
    #[arg(long, conflicts_with = "psychological")]
    pub digits: Option<u32>,
    /// Charm price (`23.99`, `19`).
    #[arg(long, default_value_t = false)]
    pub psychological: bool,
}

impl RoundArgs {
    /// Rounding mode selected by the flags.
    pub fn mode(&self) -> RoundMode {
        match (self.psychological, self.digits) {
            (true, _) => RoundMode::Psychological,
            (false, Some(digits)) => RoundMode::Digits(digits),
            (false, None) => RoundMode::Minor,
        }
    }
}

/// Arguments of `split`.
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Amount to split.
    pub amount: String,
    /// Currency or country code.
    pub currency: String,
    /// Number of parts.
    pub parts: usize,
}

/// Arguments of `format`.
#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Amount to render.
    pub amount: String,
    /// Currency or country code.
    pub currency: String,
    /// Output style.
    #[arg(long, value_enum, default_value_t = Style::Amount)]
    pub style: Style,
    /// Wrap the result in a `<span>`.
    #[arg(long, default_value_t = false)]
    pub markup: bool,
}

/// Rounding direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Half away from zero.
    Nearest,
    /// Toward positive infinity.
    Up,
    /// Toward negative infinity.
    Down,
}

/// Rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    /// No grouping.
    Plain,
    /// Grouped amount.
    Amount,
    /// Grouped amount with symbol.
    Symbol,
    /// Grouped amount with ISO code.
    CurrencyCode,
}

impl From<Style> for Format {
    fn from(style: Style) -> Self {
        match style {
            Style::Plain => Self::Plain,
            Style::Amount => Self::Amount,
            Style::Symbol => Self::Symbol,
            Style::CurrencyCode => Self::CurrencyCode,
        }
    }
}
