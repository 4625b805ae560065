//! Currency values.
//!
//! - `value` - `Money`: amount, currency, valuation time and conversion origin
//! - `arithmetic` - Fallible and decimal-operand arithmetic
//! - `compare` - Rounded equality and raw-amount ordering

mod arithmetic;
mod compare;
mod value;

#[cfg(test)]
mod value_props;

pub use arithmetic::Operand;
pub(crate) use value::normalize;
pub use value::{Money, Valuation};
