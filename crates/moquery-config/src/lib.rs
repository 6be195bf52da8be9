//! Centralized configuration management for moquery
//!
//! Configuration follows a simple hierarchy:
//! 1. Safe defaults (defined as constants)
//! 2. Optional TOML file
//! 3. Environment variable overrides (`MOQUERY_*`)
//! 4. Runtime validation
//!
//! The query fragments and the progress-logging interval are not configurable;
//! they are fixed by the search backend and live next to the code that uses them.

pub mod error;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};

// =============================================================================
// SAFE DEFAULTS
// =============================================================================

// Search Configuration
const DEFAULT_LOG_QUERY_TEXT: bool = true;
const DEFAULT_SLOW_SEARCH_WARN_MS: u64 = 10_000;

// Telemetry Configuration
const DEFAULT_TRACING_LEVEL: &str = "info";
const DEFAULT_JSON_LOGS: bool = false;
const DEFAULT_SERVICE_NAME: &str = "moquery";

/// Overwrite `target` with a parsed environment variable
///
/// Unset and unparseable variables leave `target` untouched.
fn override_from_env<T: std::str::FromStr>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key)
        && let Ok(value) = raw.parse()
    {
        *target = value;
    }
}

/// Top-level configuration for applications embedding moquery
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MoqueryConfig {
    /// Search orchestration behaviour
    pub search: SearchConfig,

    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

/// Search orchestration configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Include the full XPath expression in the submission log line.
    /// Turn off when layered metadata values are sensitive.
    pub log_query_text: bool,

    /// Completion is logged at warn level when a search runs longer than this
    pub slow_search_warn_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            log_query_text: DEFAULT_LOG_QUERY_TEXT,
            slow_search_warn_ms: DEFAULT_SLOW_SEARCH_WARN_MS,
        }
    }
}

impl SearchConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply the `MOQUERY_SEARCH_*` variables that are set
    pub fn apply_env(&mut self) {
        override_from_env("MOQUERY_SEARCH_LOG_QUERY_TEXT", &mut self.log_query_text);
        override_from_env(
            "MOQUERY_SEARCH_SLOW_SEARCH_WARN_MS",
            &mut self.slow_search_warn_ms,
        );
    }
}

impl validation::Validate for SearchConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_range(
            self.slow_search_warn_ms,
            1,
            86_400_000,
            "slow_search_warn_ms",
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Tracing level (trace, debug, info, warn, error); `RUST_LOG` still wins
    pub tracing_level: String,

    /// Emit JSON lines instead of the compact human format
    pub json_logs: bool,

    /// Service name carried by the root span from `moquery_common::init::service_span`
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tracing_level: DEFAULT_TRACING_LEVEL.to_string(),
            json_logs: DEFAULT_JSON_LOGS,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply the `MOQUERY_TELEMETRY_*` variables that are set
    pub fn apply_env(&mut self) {
        override_from_env("MOQUERY_TELEMETRY_TRACING_LEVEL", &mut self.tracing_level);
        override_from_env("MOQUERY_TELEMETRY_JSON_LOGS", &mut self.json_logs);
        override_from_env("MOQUERY_TELEMETRY_SERVICE_NAME", &mut self.service_name);
    }
}

impl validation::Validate for TelemetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.service_name, "service_name")?;
        validation::validate_tracing_level(&self.tracing_level)
    }
}

impl MoqueryConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply every `MOQUERY_*` variable that is set on top of `self`
    pub fn apply_env(&mut self) {
        self.search.apply_env();
        self.telemetry.apply_env();
    }
}

impl validation::Validate for MoqueryConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.search.validate()?;
        self.telemetry.validate()
    }
}
