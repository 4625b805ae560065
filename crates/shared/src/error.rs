//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A source named in the resolution chain has no declaration.
    #[error("Rate source '{0}' is referenced but not declared")]
    UndeclaredSource(String),

    /// Fallback sources were given without a selected source.
    #[error("Fallback sources configured without a selected source")]
    MissingSource,
}

impl ConfigError {
    /// Returns the stable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Load(_) => "CONFIG_LOAD_ERROR",
            Self::UndeclaredSource(_) => "UNDECLARED_SOURCE",
            Self::MissingSource => "MISSING_SOURCE",
        }
    }
}
