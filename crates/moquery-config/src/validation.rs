//! Configuration validation framework

use crate::{ConfigError, ConfigResult};

/// Levels accepted by the tracing subscriber's env filter
const TRACING_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Trait for validating configuration values
pub trait Validate {
    /// Validate this configuration object
    ///
    /// # Errors
    /// Returns validation errors if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Validate a value is within a range
///
/// # Errors
/// Returns `ConfigError::OutOfRange` if value is outside the specified range
pub fn validate_range(value: u64, min: u64, max: u64, field_name: &str) -> ConfigResult<()> {
    if value < min || value > max {
        Err(ConfigError::OutOfRange {
            field: field_name.to_string(),
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

/// Validate a string is not empty
///
/// # Errors
/// Returns `ConfigError::MissingField` if the string is empty or whitespace-only
pub fn validate_non_empty(value: &str, field_name: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField {
            field: field_name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Validate a tracing level name (case-insensitive)
///
/// # Errors
/// Returns `ConfigError::Generic` for anything outside trace/debug/info/warn/error
pub fn validate_tracing_level(level: &str) -> ConfigResult<()> {
    if TRACING_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::Generic {
            message: format!("Invalid tracing level: {level}"),
        })
    }
}
