//! # Relay Runtime
//!
//! Owns the container, the background tasks and the shutdown channel.
//!
//! ## Startup Sequence
//!
//! 1. Build the container (validates config, opens `management.json`)
//! 2. Grant every configured admin the wildcard method set
//! 3. Spawn the notification worker
//! 4. Spawn the name-cache sweeper
//!
//! A persistence failure anywhere is fatal: the runtime logs it and flips
//! the shutdown channel so `main` can exit.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rg_01_access_control::AccessControlError;
use rg_03_admin_dispatch::{AdminRequest, AdminResponse, DispatchError};
use shared_types::{IdentityKey, Message};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::container::{ContainerError, HostCollaborators, RelayConfig, RelayContainer};

/// How long `shutdown` waits for background tasks.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct RelayRuntime {
    container: Arc<RelayContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RelayRuntime {
    pub fn new(config: RelayConfig, host: HostCollaborators) -> Result<Self, ContainerError> {
        info!("Creating relay-guard runtime");
        let container = Arc::new(RelayContainer::new(config, host)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn container(&self) -> Arc<RelayContainer> {
        Arc::clone(&self.container)
    }

    /// Bootstrap admins and start the background tasks.
    pub async fn start(&self) -> Result<(), AccessControlError> {
        let added = self
            .container
            .store
            .bootstrap_admins(self.container.admin_keys())
            .await
            .inspect_err(|e| self.report_fatal(e))?;
        info!("[runtime] {} admins bootstrapped from configuration", added);

        let mut tasks = self.tasks.lock();

        if let Some(worker) = self.container.take_notification_worker() {
            let mut shutdown = self.shutdown_rx.clone();
            tasks.push(tokio::spawn(async move {
                tokio::select! {
                    _ = worker.run() => {}
                    _ = shutdown.changed() => {
                        info!("[rg-01] Shutdown signal received");
                    }
                }
            }));
        } else {
            warn!("[runtime] Notification worker already started");
        }

        let interval = self.container.config.names.sweep_interval;
        tasks.push(
            self.container
                .names
                .spawn_sweeper(interval, self.shutdown_rx.clone()),
        );

        info!("[runtime] Relay moderation core running ({})", self.container.config.relay_url);
        Ok(())
    }

    /// Run an admin request, shutting down if it hit a persistence failure.
    pub async fn handle_admin(
        &self,
        caller: &IdentityKey,
        request: &AdminRequest,
    ) -> Result<AdminResponse, DispatchError> {
        let result = self.container.dispatcher.handle(caller, request).await;
        if let Err(e) = &result {
            if e.is_fatal() {
                self.report_fatal(e);
            }
        }
        result
    }

    /// Post-store hook for the host relay, with the same fatal handling.
    pub async fn on_message_stored(&self, msg: &Message) -> Result<usize, AccessControlError> {
        let result = self.container.policy.on_message_stored(msg).await;
        if let Err(e) = &result {
            if e.is_fatal() {
                self.report_fatal(e);
            }
        }
        result
    }

    /// Log an unrecoverable error and signal shutdown.
    pub fn report_fatal(&self, err: &dyn Display) {
        error!("[runtime] Fatal error, shutting down: {}", err);
        self.signal_shutdown();
    }

    pub fn shutdown_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Resolve once shutdown has been signalled.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.shutdown_rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// Signal every task to stop and wait for them, up to `SHUTDOWN_GRACE`.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        self.signal_shutdown();

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("[runtime] Background task failed: {}", e),
                Err(_) => warn!("[runtime] Background task did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    fn signal_shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
