//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the Access-Control store requires the host to provide.

use async_trait::async_trait;
use shared_types::{ContentId, IdentityKey, Message};

use crate::domain::{AccessControlState, Notice};
use crate::error::{ContentStoreError, DeliveryError, StateFileError};

/// Durable storage for the access-control aggregate.
///
/// Production: `JsonStateFile`
/// Testing: `InMemoryPersistence`
pub trait StatePersistence: Send + Sync {
    /// Load the last saved state. `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<AccessControlState>, StateFileError>;

    /// Replace the saved state with `state`.
    fn save(&self, state: &AccessControlState) -> Result<(), StateFileError>;
}

/// Selector for content held by a content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentQuery {
    ByAuthor(IdentityKey),
    ById(ContentId),
}

/// An opaque store of relayed content: the event database, a search index.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn query(&self, query: &ContentQuery) -> Result<Vec<Message>, ContentStoreError>;

    async fn delete(&self, message: &Message) -> Result<(), ContentStoreError>;
}

/// Fire-and-forget sink for state-change notices.
///
/// Implementations must not block the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Transport that delivers rendered notice text to one recipient.
#[async_trait]
pub trait NotificationDelivery: Send + Sync {
    async fn deliver(&self, recipient: &IdentityKey, text: &str) -> Result<(), DeliveryError>;
}
