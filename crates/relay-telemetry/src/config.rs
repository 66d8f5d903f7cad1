//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for relay logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `info,rg_02_policy_engine=debug`
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON lines instead of human-readable output
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "relay-guard".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

fn truthy(v: &str) -> bool {
    v.eq_ignore_ascii_case("true") || v == "1"
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RELAY_SERVICE_NAME`: Service name (default: relay-guard)
    /// - `RELAY_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `RELAY_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `RELAY_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("RELAY_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("RELAY_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("RELAY_CONSOLE_OUTPUT")
                .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
                .unwrap_or(defaults.console_output),

            json_logs: lookup("RELAY_JSON_LOGS")
                .map(|v| truthy(&v))
                .unwrap_or(is_container),
        }
    }
}
