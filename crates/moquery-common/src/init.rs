//! Global initialization utilities for applications embedding moquery

use moquery_config::TelemetryConfig;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize the process environment
///
/// Loads variables from a `.env` file in the current directory or any parent,
/// so `MOQUERY_*` overrides can live next to the embedding application.
///
/// Safe to call multiple times - will only run once
pub fn initialize_environment() {
    INIT.call_once(|| {
        dotenvy::dotenv().ok();
    });
}

/// Install the global tracing subscriber from the telemetry section
///
/// `RUST_LOG` wins over `tracing_level` when set. With `json_logs` the output
/// is one JSON object per event, otherwise the compact human format.
///
/// Returns `false` when a global subscriber was already installed, which is
/// the normal case in test binaries that call this more than once.
pub fn init_tracing(config: &TelemetryConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.tracing_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .try_init()
    };

    result.is_ok()
}

/// Root span carrying `service_name` for everything logged inside it
///
/// Embedding applications enter this once at startup so every event,
/// including each search's span, is tagged with the service.
pub fn service_span(config: &TelemetryConfig) -> tracing::Span {
    tracing::info_span!("service", service_name = %config.service_name)
}
