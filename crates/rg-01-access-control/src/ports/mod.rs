//! Ports layer for Access Control

pub mod outbound;

pub use outbound::{ContentQuery, ContentStore, NotificationDelivery, Notifier, StatePersistence};
