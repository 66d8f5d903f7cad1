//! Live connection figures for the `stats` admin command.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rg_03_admin_dispatch::StatsSource;

/// Counts open connections and remembers when the relay started.
///
/// The host transport calls `opened`/`closed` around each connection.
#[derive(Debug)]
pub struct ConnectionGauge {
    connections: AtomicU64,
    started_at: Instant,
}

impl ConnectionGauge {
    pub fn new() -> Self {
        Self {
            connections: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn opened(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Saturates at zero.
    pub fn closed(&self) {
        let _ = self
            .connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }
}

impl Default for ConnectionGauge {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSource for ConnectionGauge {
    fn num_connections(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }

    fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
