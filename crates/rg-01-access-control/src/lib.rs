//! # Access Control (rg-01)
//!
//! The durable allow/ban store every moderation decision is made against.
//!
//! ## Architecture
//!
//! ```text
//! Admin Dispatch (3) ──mutations──→ ┐
//!                                    ├──→ AccessControlStore ──save()──→ management.json
//! Policy Engine (2) ───reads──────→ ┘          │
//!                                              ├──delete()──→ ContentStore(s)
//!                                              └──notify()──→ NotificationQueue ──→ worker
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Identity Exclusivity | An identity is never both allowed and banned |
//! | 2 | Kind Exclusivity | A kind is never both allowed and disallowed |
//! | 3 | No Empty Grants | Revoking the last method removes the admin |
//! | 4 | Write-Through | Every mutation is on disk before the lock is released |
//! | 5 | Cascade First | Content deletion completes before a ban takes effect |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - State aggregate, admin methods, notices
//! - `ports/` - Outbound SPI: persistence, content stores, notification
//! - `adapters/` - JSON state file, notification queue, in-memory adapters
//! - `service/` - `AccessControlStore`

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    InMemoryContentStore, InMemoryPersistence, JsonStateFile, NoopNotifier, NotificationQueue,
    NotificationWorker, RecordingNotifier,
};
pub use domain::{permits, AccessControlState, AdminMethod, MethodSet, Notice, Reason, UnknownMethod};
pub use error::{
    AccessControlError, ContentStoreError, DeliveryError, ErrorClass, StateFileError, Subject,
};
pub use ports::{ContentQuery, ContentStore, NotificationDelivery, Notifier, StatePersistence};
pub use service::{AccessControlDependencies, AccessControlStore};
