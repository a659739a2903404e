//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the process-wide diagnostics subscriber
//! - Report configuration warnings
//!
//! # Design Decisions
//! - Configuration problems are reported, never fatal
//! - Subsystems initialize in order: config, metrics, logger, listener

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::validation::validate_config;
use crate::config::AppConfig;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "hello_rapp=info,tower_http=info";

/// Initialize the tracing subscriber for library and framework diagnostics.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_DIRECTIVES.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Log every validation warning for `config`. Returns how many there were.
pub fn report_config_warnings(config: &AppConfig) -> usize {
    let warnings = validate_config(config);
    for warning in &warnings {
        tracing::warn!(%warning, "Configuration warning");
    }
    warnings.len()
}
