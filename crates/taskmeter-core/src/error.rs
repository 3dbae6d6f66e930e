//! Core error types for taskmeter-core.
//!
//! Errors are grouped per concern with thiserror. Nothing here is fatal to an
//! interactive session: the presentation layer decides how each one shows up.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskmeter-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Earnings could not be computed
    #[error("Earnings error: {0}")]
    Earnings(#[from] EarningsError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare config directory {path}: {source}")]
    DirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Failures converting elapsed time into money.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EarningsError {
    #[error("earnings for {elapsed_secs}s at {rate_per_minute} per minute overflow")]
    Overflow {
        elapsed_secs: u64,
        rate_per_minute: rust_decimal::Decimal,
    },
}

/// Failures of the exact compound projection.
///
/// These never reach the user verbatim; they are rendered as
/// [`crate::format::CALCULATION_ERROR`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// `years * 365` does not fit the period counter
    #[error("period count overflows for {years} years")]
    PeriodOverflow { years: u32 },

    /// Exponent above the supported ceiling
    #[error("{periods} compounding periods exceeds the limit of {max}")]
    TooManyPeriods { periods: u64, max: u64 },

    /// A decimal input could not be represented as an integer
    #[error("cannot scale {field} value {value} to an integer")]
    Unscalable { field: &'static str, value: String },

    /// Denominator collapsed to zero
    #[error("division by zero in projection")]
    DivisionByZero,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
