//! Rate sources.
//!
//! A [`RateSource`] does the transport work and returns a [`RateTable`]. The
//! [`Source`] handle wraps one with the shared cache and keeps the latest
//! snapshot, exposing the `base`/`rates`/`timestamp`/`rate`/`convert`
//! operations the exchange resolves conversions with.

pub mod error;
pub mod handle;
pub mod source;
pub mod table;

pub use error::{SourceError, SourceErrorKind};
pub use handle::{API_CONVERT_DP, Source};
pub use source::{FileSource, RateOptions, RateSource, StaticSource};
pub use table::RateTable;
