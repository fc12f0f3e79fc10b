//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Keyboard columns must be between 1 and 8")]
    InvalidKeyboardColumns,

    #[error("Session idle TTL must be positive")]
    InvalidSessionTtl,

    #[error("Eviction interval must be positive and not exceed the session TTL")]
    InvalidEvictionInterval,

    #[error("Currency must be a three-letter ISO 4217 code")]
    InvalidCurrency,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}
