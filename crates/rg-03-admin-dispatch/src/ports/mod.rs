//! # Outbound Ports

use std::time::Duration;

/// Live relay figures reported by the `stats` command.
pub trait StatsSource: Send + Sync {
    fn num_connections(&self) -> u64;

    fn uptime(&self) -> Duration;
}
