//! # Relay Telemetry
//!
//! Structured logging for the relay moderation core, built on
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RELAY_LOG_LEVEL` / `RUST_LOG` | `info` | `EnvFilter` directive |
//! | `RELAY_JSON_LOGS` | `false` | JSON lines output |
//! | `RELAY_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `RELAY_SERVICE_NAME` | `relay-guard` | Name in the startup line |

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber described by `config`.
///
/// Can only succeed once per process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}
