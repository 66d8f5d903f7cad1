//! # Name Resolver Service
//!
//! Serves lookups from the cache, falling back to the backing document on a
//! miss. Mapping changes rewrite the document and drop the affected cache
//! entry so the next lookup sees them.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_types::IdentityKey;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{NameCache, NameCacheConfig, NameDocument};
use crate::error::NameError;
use crate::ports::{NameDocumentStore, TimeSource};

pub struct NameResolver {
    store: Arc<dyn NameDocumentStore>,
    clock: Arc<dyn TimeSource>,
    config: NameCacheConfig,
    cache: Mutex<NameCache>,
    /// Serializes document rewrites.
    write_lock: Mutex<()>,
}

impl NameResolver {
    pub fn new(
        store: Arc<dyn NameDocumentStore>,
        clock: Arc<dyn TimeSource>,
        config: NameCacheConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            cache: Mutex::new(NameCache::new()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &NameCacheConfig {
        &self.config
    }

    /// Resolve `name` to its single-name document.
    pub fn resolve(&self, name: &str) -> Result<NameDocument, NameError> {
        let now = self.clock.now();
        let generation = {
            let mut cache = self.cache.lock();
            if let Some(hit) = cache.get(name, now) {
                return Ok(hit);
            }
            cache.generation()
        };

        let document = self.store.load()?;
        let resolution = document
            .resolution_for(name)
            .ok_or_else(|| NameError::NotFound(name.to_string()))?;

        // A mapping change that landed during the load may have been read stale.
        if self
            .cache
            .lock()
            .insert_if_current(name, resolution.clone(), now, generation)
        {
            debug!("[rg-04] Cached resolution for {}", name);
        } else {
            debug!("[rg-04] Mapping changed while resolving {}, not cached", name);
        }
        Ok(resolution)
    }

    /// Evict idle entries. Returns the number evicted.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let evicted = self.cache.lock().sweep(now, self.config.idle_threshold);
        if evicted > 0 {
            debug!("[rg-04] Swept {} idle names", evicted);
        }
        evicted
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Map `name` to `id`, replacing any earlier mapping.
    pub fn set_mapping(&self, name: &str, id: IdentityKey) -> Result<(), NameError> {
        let _guard = self.write_lock.lock();

        let mut document = self.store.load()?;
        document.names.insert(name.to_string(), id);
        self.store.save(&document)?;

        self.cache.lock().invalidate(name);
        info!("[rg-04] Name {} set", name);
        Ok(())
    }

    /// Remove the mapping for `name`. Returns `false` when it was not mapped.
    pub fn remove_mapping(&self, name: &str) -> Result<bool, NameError> {
        let _guard = self.write_lock.lock();

        let mut document = self.store.load()?;
        let removed = document.names.remove(name).is_some();
        self.store.save(&document)?;

        self.cache.lock().invalidate(name);
        info!("[rg-04] Name {} unset", name);
        Ok(removed)
    }

    /// Run `sweep` every `interval` until `shutdown` flips.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let resolver = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            info!("[rg-04] Name cache sweeper started (every {:?})", interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        resolver.sweep();
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            warn!("[rg-04] Shutdown channel closed");
                        }
                        break;
                    }
                }
            }

            info!("[rg-04] Name cache sweeper stopped");
        })
    }
}
