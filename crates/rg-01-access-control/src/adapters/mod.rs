//! Adapters for the Access-Control ports.

pub mod memory;
pub mod notifications;
pub mod state_file;

pub use memory::{InMemoryContentStore, InMemoryPersistence, NoopNotifier, RecordingNotifier};
pub use notifications::{NotificationQueue, NotificationWorker, DEFAULT_QUEUE_CAPACITY};
pub use state_file::{JsonStateFile, STATE_FILE_NAME};
