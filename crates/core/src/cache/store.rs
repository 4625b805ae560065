//! Rate table caching.
//!
//! The cache is a pure memoizing wrapper around the block that does the
//! actual fetch work: compute-if-absent, with expiry handled by the backend
//! and by the period baked into each [`CacheKey`].

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use forex_shared::{CacheBackendConfig, CacheConfig, CacheExpiry};
use moka::sync::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::debug;

use super::key::CacheKey;
use crate::error::{ExchangeError, ExchangeResult};

/// Default in-memory capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Makes a key or namespace usable as a file name.
fn file_safe(raw: &str) -> String {
    raw.replace([':', '/', '\\'], "_")
}

/// Where cached entries live.
#[derive(Clone)]
pub enum CacheBackend {
    /// No caching, blocks always run.
    Disabled,
    /// In-process cache of serialized entries.
    Memory(Cache<String, Arc<str>>),
    /// One JSON file per key under `<dir>/<namespace>/`.
    File(PathBuf),
}

impl std::fmt::Debug for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Memory(cache) => f.debug_tuple("Memory").field(&cache.entry_count()).finish(),
            Self::File(dir) => f.debug_tuple("File").field(dir).finish(),
        }
    }
}

/// Cache for rate tables.
///
/// Thread-safe; cloning shares the underlying backend.
#[derive(Debug, Clone)]
pub struct RateCache {
    backend: CacheBackend,
    namespace: String,
    expiry: CacheExpiry,
}

impl RateCache {
    /// Creates a cache that never stores anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            backend: CacheBackend::Disabled,
            namespace: "forex".to_string(),
            expiry: CacheExpiry::Daily,
        }
    }

    /// Creates an in-memory cache with default capacity.
    #[must_use]
    pub fn memory(expiry: CacheExpiry) -> Self {
        Self::memory_with_capacity(DEFAULT_CACHE_CAPACITY, expiry)
    }

    /// Creates an in-memory cache holding at most `max_capacity` entries,
    /// each living for one expiry period.
    #[must_use]
    pub fn memory_with_capacity(max_capacity: u64, expiry: CacheExpiry) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(expiry.period_secs()))
            .build();

        Self {
            backend: CacheBackend::Memory(cache),
            namespace: "forex".to_string(),
            expiry,
        }
    }

    /// Creates a file cache under `dir`.
    #[must_use]
    pub fn file(dir: impl Into<PathBuf>, expiry: CacheExpiry) -> Self {
        Self {
            backend: CacheBackend::File(dir.into()),
            namespace: "forex".to_string(),
            expiry,
        }
    }

    /// Builds the configured backend.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        let cache = match &config.backend {
            CacheBackendConfig::Disabled => Self {
                expiry: config.expiry,
                ..Self::disabled()
            },
            CacheBackendConfig::Memory { capacity } => {
                Self::memory_with_capacity(*capacity, config.expiry)
            }
            CacheBackendConfig::File { dir } => Self::file(dir.clone(), config.expiry),
        };
        cache.with_namespace(config.namespace.clone())
    }

    /// Replaces the key namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Whether entries are stored at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self.backend, CacheBackend::Disabled)
    }

    /// Key for `source` rates valid at `at`.
    #[must_use]
    pub fn key(&self, source: &str, at: DateTime<Utc>) -> CacheKey {
        CacheKey::new(self.namespace.clone(), source, at, self.expiry)
    }

    /// Returns the cached value for `key`, running `compute` on a miss.
    ///
    /// Errors from `compute` are returned as-is and nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `CachingWithoutBlock` when `compute` is `None`, `Cache` when
    /// the backend cannot read or write the entry, or the block's own error.
    pub fn cached<T, F>(&self, key: &CacheKey, compute: Option<F>) -> ExchangeResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> ExchangeResult<T>,
    {
        let compute = compute.ok_or(ExchangeError::CachingWithoutBlock)?;
        let rendered = key.to_string();

        match &self.backend {
            CacheBackend::Disabled => compute(),
            CacheBackend::Memory(cache) => {
                if let Some(hit) = cache.get(&rendered) {
                    debug!(key = %rendered, "rate cache hit");
                    return Ok(serde_json::from_str(&hit)?);
                }

                debug!(key = %rendered, "rate cache miss");
                let value = compute()?;
                cache.insert(rendered, Arc::from(serde_json::to_string(&value)?));
                Ok(value)
            }
            CacheBackend::File(dir) => {
                let dir = self.namespace_dir(dir);
                let path = dir.join(format!("{}.json", file_safe(&rendered)));
                match fs::read_to_string(&path) {
                    Ok(body) => {
                        debug!(key = %rendered, path = %path.display(), "rate cache hit");
                        return Ok(serde_json::from_str(&body)?);
                    }
                    Err(err) if err.kind() == ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }

                debug!(key = %rendered, path = %path.display(), "rate cache miss");
                let value = compute()?;
                fs::create_dir_all(&dir)?;
                // Staged in the same directory so the rename stays atomic.
                let mut staged = NamedTempFile::new_in(&dir)?;
                staged.write_all(serde_json::to_string(&value)?.as_bytes())?;
                staged.persist(&path).map_err(|err| err.error)?;
                Ok(value)
            }
        }
    }

    fn namespace_dir(&self, dir: &Path) -> PathBuf {
        dir.join(file_safe(&self.namespace))
    }

    /// Drops every cached entry of this namespace.
    ///
    /// # Errors
    ///
    /// Returns `Cache` if cache files cannot be removed.
    pub fn invalidate_all(&self) -> ExchangeResult<()> {
        match &self.backend {
            CacheBackend::Disabled => Ok(()),
            CacheBackend::Memory(cache) => {
                cache.invalidate_all();
                cache.run_pending_tasks();
                Ok(())
            }
            CacheBackend::File(dir) => match fs::remove_dir_all(self.namespace_dir(dir)) {
                Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            },
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::memory(CacheExpiry::Daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::Cell;

    fn key(cache: &RateCache) -> CacheKey {
        cache.key("ecb", Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap())
    }

    fn counting_block(calls: &Cell<u32>) -> impl FnOnce() -> ExchangeResult<u32> + '_ {
        move || {
            calls.set(calls.get() + 1);
            Ok(42)
        }
    }

    #[test]
    fn test_missing_block_fails() {
        let cache = RateCache::memory(CacheExpiry::Daily);
        let result = cache.cached::<u32, fn() -> ExchangeResult<u32>>(&key(&cache), None);
        assert!(matches!(result, Err(ExchangeError::CachingWithoutBlock)));
    }

    #[test]
    fn test_disabled_always_computes() {
        let cache = RateCache::disabled();
        let calls = Cell::new(0);
        assert_eq!(cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap(), 42);
        assert_eq!(cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap(), 42);
        assert_eq!(calls.get(), 2);
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_memory_miss_then_hit() {
        let cache = RateCache::memory(CacheExpiry::Daily);
        let calls = Cell::new(0);
        assert_eq!(cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap(), 42);
        assert_eq!(cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_block_errors_are_not_cached() {
        let cache = RateCache::memory(CacheExpiry::Daily);
        let failed: ExchangeResult<u32> =
            cache.cached(&key(&cache), Some(|| Err(ExchangeError::Cache("boom".into()))));
        assert!(failed.is_err());

        let calls = Cell::new(0);
        assert_eq!(cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_invalidate_all_memory() {
        let cache = RateCache::memory(CacheExpiry::Hourly);
        let calls = Cell::new(0);
        cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap();
        cache.invalidate_all().unwrap();
        cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_file_cache_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Cell::new(0);

        let first = RateCache::file(dir.path(), CacheExpiry::Daily);
        first.cached(&key(&first), Some(counting_block(&calls))).unwrap();

        let second = RateCache::file(dir.path(), CacheExpiry::Daily);
        assert_eq!(second.cached(&key(&second), Some(counting_block(&calls))).unwrap(), 42);
        assert_eq!(calls.get(), 1);

        second.invalidate_all().unwrap();
        second.cached(&key(&second), Some(counting_block(&calls))).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_from_config_uses_namespace() {
        let config = CacheConfig {
            backend: CacheBackendConfig::Disabled,
            expiry: CacheExpiry::Hourly,
            namespace: "rates".to_string(),
        };
        let cache = RateCache::from_config(&config);
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        assert_eq!(cache.key("ecb", at).to_string(), "rates:ecb:2026:289:9");
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_file_invalidation_is_scoped_to_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Cell::new(0);

        let forex = RateCache::file(dir.path(), CacheExpiry::Daily);
        let forex_eu = RateCache::file(dir.path(), CacheExpiry::Daily).with_namespace("forex_eu");
        forex.cached(&key(&forex), Some(counting_block(&calls))).unwrap();
        forex_eu.cached(&key(&forex_eu), Some(counting_block(&calls))).unwrap();
        assert_eq!(calls.get(), 2);

        forex.invalidate_all().unwrap();
        forex_eu.cached(&key(&forex_eu), Some(counting_block(&calls))).unwrap();
        assert_eq!(calls.get(), 2);
        forex.cached(&key(&forex), Some(counting_block(&calls))).unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_file_entry_written_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RateCache::file(dir.path(), CacheExpiry::Daily);
        let calls = Cell::new(0);
        cache.cached(&key(&cache), Some(counting_block(&calls))).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path().join("forex"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["forex_ecb_2026_289.json".to_string()]);
    }
}
