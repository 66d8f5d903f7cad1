//! # Relay Container
//!
//! Builds the subsystems in dependency order:
//!
//! ```text
//! rg-01 AccessControlStore ← JsonStateFile, NotificationQueue, content stores
//! rg-04 NameResolver       ← JsonNameFile, SystemClock
//! rg-02 PolicyEngine       ← rg-01
//! rg-03 AdminDispatcher    ← rg-01, rg-04, ConnectionGauge, NotificationQueue
//! ```
//!
//! The notification receiver is parked here until the runtime starts the
//! worker that drains it.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use rg_01_access_control::{
    AccessControlDependencies, AccessControlStore, ContentStore, InMemoryContentStore,
    JsonStateFile, Notice, NotificationDelivery, NotificationQueue, NotificationWorker,
    StateFileError,
};
use rg_02_policy_engine::PolicyEngine;
use rg_03_admin_dispatch::{AdminDispatchDependencies, AdminDispatcher};
use rg_04_name_resolution::{JsonNameFile, NameResolver, SystemClock};
use shared_types::IdentityKey;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

use crate::adapters::{ConnectionGauge, LoggingDelivery};
use crate::container::config::{ConfigError, RelayConfig};

/// Errors raised while assembling the subsystems.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open access-control state: {0}")]
    State(#[from] StateFileError),
}

/// What the hosting relay plugs in.
pub struct HostCollaborators {
    pub delivery: Arc<dyn NotificationDelivery>,
    pub content_stores: Vec<Arc<dyn ContentStore>>,
}

impl Default for HostCollaborators {
    /// Log notifications, keep content in memory.
    fn default() -> Self {
        Self {
            delivery: Arc::new(LoggingDelivery),
            content_stores: vec![Arc::new(InMemoryContentStore::new())],
        }
    }
}

/// All subsystem instances of a running relay.
pub struct RelayContainer {
    pub config: RelayConfig,
    /// Access-Control (rg-01)
    pub store: Arc<AccessControlStore>,
    /// Policy Engine (rg-02)
    pub policy: Arc<PolicyEngine>,
    /// Admin Dispatch (rg-03)
    pub dispatcher: Arc<AdminDispatcher>,
    /// Name Resolution (rg-04)
    pub names: Arc<NameResolver>,
    /// Connection figures reported by `stats`.
    pub connections: Arc<ConnectionGauge>,

    admin_keys: Vec<IdentityKey>,
    delivery: Arc<dyn NotificationDelivery>,
    notifications: Mutex<Option<mpsc::Receiver<Notice>>>,
}

impl RelayContainer {
    /// Validate `config` and build every subsystem.
    pub fn new(config: RelayConfig, host: HostCollaborators) -> Result<Self, ContainerError> {
        config.validate()?;
        let admin_keys = config.admin_keys()?;

        std::fs::create_dir_all(&config.work_dir).map_err(|source| ContainerError::WorkDir {
            path: config.work_dir.clone(),
            source,
        })?;
        info!("[runtime] Work directory: {}", config.work_dir.display());

        let (queue, receiver) = NotificationQueue::channel(config.notification_queue);
        let queue = Arc::new(queue);

        let store = Arc::new(AccessControlStore::open(AccessControlDependencies {
            persistence: Arc::new(JsonStateFile::in_dir(&config.work_dir)),
            notifier: queue.clone(),
            content_stores: host.content_stores,
        })?);

        let names = Arc::new(NameResolver::new(
            Arc::new(JsonNameFile::in_dir(&config.work_dir)),
            Arc::new(SystemClock),
            config.names,
        ));

        let policy = Arc::new(PolicyEngine::new(store.clone(), config.policy));

        let connections = Arc::new(ConnectionGauge::new());
        let dispatcher = Arc::new(AdminDispatcher::new(AdminDispatchDependencies {
            store: store.clone(),
            names: names.clone(),
            stats: connections.clone(),
            notifier: queue,
        }));

        info!(
            "[runtime] Subsystems ready (pubkey allow list: {}, kind allow list: {})",
            config.policy.identity_allow_list, config.policy.kind_allow_list
        );

        Ok(Self {
            config,
            store,
            policy,
            dispatcher,
            names,
            connections,
            admin_keys,
            delivery: host.delivery,
            notifications: Mutex::new(Some(receiver)),
        })
    }

    /// Admins from configuration, normalized.
    pub fn admin_keys(&self) -> &[IdentityKey] {
        &self.admin_keys
    }

    /// Hand out the notification worker. Only the first call gets one.
    pub fn take_notification_worker(&self) -> Option<NotificationWorker> {
        let receiver = self.notifications.lock().take()?;
        Some(NotificationWorker::new(
            receiver,
            self.delivery.clone(),
            self.admin_keys.clone(),
            self.config.relay_url.clone(),
        ))
    }
}
