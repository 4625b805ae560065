//! Rate table cache.
//!
//! Memoizes source updates per `(source, period)` so a rate table is not
//! fetched more often than the configured expiry granularity.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheBackend, RateCache};
