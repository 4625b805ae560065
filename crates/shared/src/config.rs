//! Exchange configuration management.
//!
//! Configuration is read-only once loaded. It names the selected rate source,
//! the ordered fallback list, the mixed-operation and tracing policies, the
//! cache backend and the declared sources themselves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Exchange configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Identifier of the selected rate source.
    #[serde(default)]
    pub source: String,
    /// Ordered fallback sources, consulted after `source`.
    #[serde(default)]
    pub fallback: Vec<String>,
    /// Whether arithmetic may mix currencies (converting implicitly).
    #[serde(default = "default_true")]
    pub allow_mixed_operations: bool,
    /// Whether converted values remember what they were converted from.
    #[serde(default = "default_true")]
    pub trace_conversions: bool,
    /// Rate cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Declared rate sources keyed by identifier.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            fallback: Vec::new(),
            allow_mixed_operations: true,
            trace_conversions: true,
            cache: CacheConfig::default(),
            sources: BTreeMap::new(),
        }
    }
}

/// Declared rate source.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Rates declared inline, relative to `base`.
    Static {
        /// Base currency code.
        base: String,
        /// Rates keyed by currency code.
        rates: BTreeMap<String, Decimal>,
    },
    /// Rate table read from a JSON document on disk.
    File {
        /// Path of the JSON rate table.
        path: PathBuf,
        /// Currencies the document is expected to carry.
        currencies: Vec<String>,
    },
}

/// Rate cache configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Cache backend.
    #[serde(default)]
    pub backend: CacheBackendConfig,
    /// Expiry granularity of cached rate tables.
    #[serde(default)]
    pub expiry: CacheExpiry,
    /// Key namespace.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "forex".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendConfig::default(),
            expiry: CacheExpiry::default(),
            namespace: default_namespace(),
        }
    }
}

/// Cache backend selection.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheBackendConfig {
    /// No caching, every update hits the source.
    Disabled,
    /// In-process cache.
    Memory {
        /// Maximum number of cached rate tables.
        #[serde(default = "default_capacity")]
        capacity: u64,
    },
    /// One JSON file per cache key under `dir`.
    File {
        /// Cache directory.
        dir: PathBuf,
    },
}

impl Default for CacheBackendConfig {
    fn default() -> Self {
        Self::Memory {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> u64 {
    256
}

/// How long a cached rate table stays valid.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CacheExpiry {
    /// One rate table per source per day.
    #[default]
    Daily,
    /// One rate table per source per hour.
    Hourly,
}

impl CacheExpiry {
    /// Length of one expiry period in seconds.
    #[must_use]
    pub const fn period_secs(self) -> u64 {
        match self {
            Self::Daily => 86_400,
            Self::Hourly => 3_600,
        }
    }
}

impl ExchangeConfig {
    /// Loads configuration from config files and environment.
    ///
    /// Reads `config/default`, then `config/{RUN_MODE}`, then `FOREX__*`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_from(Path::new("config"), &run_mode)
    }

    /// Loads configuration from `dir/default` and `dir/{run_mode}` plus environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load_from(dir: &Path, run_mode: &str) -> Result<Self, ConfigError> {
        let default_file = dir.join("default");
        let mode_file = dir.join(run_mode);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&mode_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("FOREX")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("fallback")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks that every source in the resolution chain is declared.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first undeclared source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.is_empty() {
            if self.fallback.is_empty() {
                return Ok(());
            }
            return Err(ConfigError::MissingSource);
        }

        match self.chain().into_iter().find(|id| !self.sources.contains_key(*id)) {
            Some(undeclared) => Err(ConfigError::UndeclaredSource(undeclared.to_string())),
            None => Ok(()),
        }
    }

    /// Resolution order: the selected source, then the fallbacks.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    #[must_use]
    pub fn chain(&self) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::with_capacity(self.fallback.len() + 1);
        for id in std::iter::once(&self.source).chain(self.fallback.iter()) {
            if !id.is_empty() && !chain.contains(&id.as_str()) {
                chain.push(id);
            }
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    fn static_source(base: &str) -> SourceConfig {
        SourceConfig::Static {
            base: base.to_string(),
            rates: BTreeMap::from([("USD".to_string(), dec!(1.1))]),
        }
    }

    #[test]
    fn test_chain_dedupes_and_keeps_order() {
        let config = ExchangeConfig {
            source: "ecb".into(),
            fallback: vec!["manual".into(), "ecb".into(), "file".into(), "manual".into()],
            ..ExchangeConfig::default()
        };
        assert_eq!(config.chain(), vec!["ecb", "manual", "file"]);
    }

    #[test]
    fn test_validate_rejects_undeclared_fallback() {
        let config = ExchangeConfig {
            source: "ecb".into(),
            fallback: vec!["missing".into()],
            sources: BTreeMap::from([("ecb".to_string(), static_source("EUR"))]),
            ..ExchangeConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UndeclaredSource(ref id) if id == "missing"));
    }

    #[test]
    fn test_validate_requires_source_when_fallback_given() {
        let config = ExchangeConfig {
            fallback: vec!["ecb".into()],
            ..ExchangeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingSource)));
    }

    #[test]
    fn test_cache_backend_defaults_to_memory() {
        assert_eq!(CacheBackendConfig::default(), CacheBackendConfig::Memory { capacity: 256 });
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ExchangeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.allow_mixed_operations);
        assert!(config.trace_conversions);
        assert_eq!(config.cache.namespace, "forex");
        assert_eq!(config.cache.backend, CacheBackendConfig::Memory { capacity: 256 });
        assert_eq!(config.cache.expiry, CacheExpiry::Daily);
    }

    #[test]
    fn test_expiry_periods() {
        assert_eq!(CacheExpiry::Daily.period_secs(), 86_400);
        assert_eq!(CacheExpiry::Hourly.period_secs(), 3_600);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
source = "manual"
fallback = ["rates_file"]
allow_mixed_operations = false

[cache]
expiry = "hourly"
backend = { type = "disabled" }

[sources.manual]
kind = "static"
base = "EUR"
rates = { USD = "1.0865", GBP = "0.8571" }

[sources.rates_file]
kind = "file"
path = "/var/lib/forex/rates.json"
currencies = ["EUR", "USD"]
"#,
        )
        .unwrap();

        temp_env::with_vars_unset(["FOREX__SOURCE", "FOREX__FALLBACK"], || {
            let config = ExchangeConfig::load_from(dir.path(), "test").unwrap();
            assert_eq!(config.source, "manual");
            assert_eq!(config.chain(), vec!["manual", "rates_file"]);
            assert!(!config.allow_mixed_operations);
            assert!(config.trace_conversions);
            assert_eq!(config.cache.expiry, CacheExpiry::Hourly);
            assert_eq!(config.cache.backend, CacheBackendConfig::Disabled);
            match &config.sources["manual"] {
                SourceConfig::Static { base, rates } => {
                    assert_eq!(base, "EUR");
                    assert_eq!(rates["USD"], dec!(1.0865));
                }
                other => panic!("unexpected source: {other:?}"),
            }
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
source = "manual"

[sources.manual]
kind = "static"
base = "EUR"
rates = { USD = "1.0865" }

[sources.backup]
kind = "static"
base = "USD"
rates = { EUR = "0.92" }
"#,
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("FOREX__SOURCE", Some("backup")),
                ("FOREX__FALLBACK", Some("manual")),
            ],
            || {
                let config = ExchangeConfig::load_from(dir.path(), "test").unwrap();
                assert_eq!(config.chain(), vec!["backup", "manual"]);
            },
        );
    }
}
