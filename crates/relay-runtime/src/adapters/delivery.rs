//! Notification delivery that writes to the log.
//!
//! The moderation core has no transport of its own. A host relay replaces
//! this with a delivery that publishes direct messages.

use async_trait::async_trait;
use rg_01_access_control::{DeliveryError, NotificationDelivery};
use shared_types::IdentityKey;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDelivery;

#[async_trait]
impl NotificationDelivery for LoggingDelivery {
    async fn deliver(&self, recipient: &IdentityKey, text: &str) -> Result<(), DeliveryError> {
        info!(recipient = %recipient, "[runtime] Admin notification: {}", text);
        Ok(())
    }
}
