//! Bounded notification queue and its delivery worker.
//!
//! ```text
//! store ──notify()──→ [bounded mpsc] ──→ NotificationWorker ──deliver()──→ each recipient
//! ```
//!
//! `notify` never waits: when the queue is full the notice is dropped with a
//! warning.

use std::sync::Arc;

use shared_types::IdentityKey;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::Notice;
use crate::ports::{NotificationDelivery, Notifier};

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Producer half, handed to the store as its `Notifier`.
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<Notice>,
}

impl NotificationQueue {
    /// Create a queue and the receiver the worker will drain.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notice: Notice) {
        match self.sender.try_send(notice) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(notice)) => {
                warn!("[rg-01] Notification queue full, dropping {:?}", notice);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("[rg-01] Notification worker stopped, notice discarded");
            }
        }
    }
}

/// Drains the queue and fans each notice out to every recipient.
pub struct NotificationWorker {
    receiver: mpsc::Receiver<Notice>,
    delivery: Arc<dyn NotificationDelivery>,
    recipients: Vec<IdentityKey>,
    relay_url: String,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::Receiver<Notice>,
        delivery: Arc<dyn NotificationDelivery>,
        recipients: Vec<IdentityKey>,
        relay_url: impl Into<String>,
    ) -> Self {
        Self {
            receiver,
            delivery,
            recipients,
            relay_url: relay_url.into(),
        }
    }

    /// Run until every `NotificationQueue` handle is dropped.
    pub async fn run(mut self) {
        info!(
            "[rg-01] Notification worker started ({} recipients)",
            self.recipients.len()
        );

        while let Some(notice) = self.receiver.recv().await {
            let text = notice.render(&self.relay_url);
            for recipient in &self.recipients {
                if let Err(e) = self.delivery.deliver(recipient, &text).await {
                    warn!("[rg-01] Can't send notification to {}: {}", recipient, e);
                }
            }
        }

        info!("[rg-01] Notification worker stopped");
    }
}
