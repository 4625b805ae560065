//! ISO 4217 currency table, precision engine and rendering.

pub mod allocation;
pub mod code;
pub mod format;
pub mod iso4217;
pub mod precision;

#[cfg(test)]
mod precision_props;

pub use allocation::AllocationUtil;
pub use code::{CurrencyCode, IntoCurrency};
pub use format::Format;
pub use iso4217::Iso4217Entry;
pub use precision::{Iso4217, RawAmount, RoundMode};
