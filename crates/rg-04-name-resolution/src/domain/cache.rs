//! Idle-evicting cache of resolved names.
//!
//! Entries are refreshed on every hit and dropped by `sweep` once they have
//! been idle for at least the threshold. There is no size bound; the sweep
//! is the only eviction.

use std::collections::HashMap;
use std::time::Duration;

use super::document::NameDocument;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// How often the background sweep runs.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
/// How long an entry may go unread before a sweep evicts it.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameCacheConfig {
    pub sweep_interval: Duration,
    pub idle_threshold: Duration,
}

impl Default for NameCacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCacheEntry {
    pub resolution: NameDocument,
    pub last_accessed_at: Timestamp,
}

#[derive(Debug, Default)]
pub struct NameCache {
    entries: HashMap<String, NameCacheEntry>,
    /// Bumped on every invalidation.
    generation: u64,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached resolution for `name`, refreshing its access time.
    pub fn get(&mut self, name: &str, now: Timestamp) -> Option<NameDocument> {
        let entry = self.entries.get_mut(name)?;
        entry.last_accessed_at = now;
        Some(entry.resolution.clone())
    }

    pub fn insert(&mut self, name: impl Into<String>, resolution: NameDocument, now: Timestamp) {
        self.entries.insert(
            name.into(),
            NameCacheEntry {
                resolution,
                last_accessed_at: now,
            },
        );
    }

    pub fn invalidate(&mut self, name: &str) -> bool {
        self.generation += 1;
        self.entries.remove(name).is_some()
    }

    /// Counter that changes whenever a mapping is invalidated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Insert only if no invalidation happened since `generation` was read.
    pub fn insert_if_current(
        &mut self,
        name: impl Into<String>,
        resolution: NameDocument,
        now: Timestamp,
        generation: u64,
    ) -> bool {
        if self.generation != generation {
            return false;
        }
        self.insert(name, resolution, now);
        true
    }

    /// Evict entries idle for at least `idle`. Returns the eviction count.
    pub fn sweep(&mut self, now: Timestamp, idle: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            Duration::from_secs(now.saturating_sub(entry.last_accessed_at)) < idle
        });
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_accessed_at(&self, name: &str) -> Option<Timestamp> {
        self.entries.get(name).map(|e| e.last_accessed_at)
    }
}
