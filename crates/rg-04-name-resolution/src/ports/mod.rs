//! # Outbound Ports

use crate::domain::{NameDocument, Timestamp};
use crate::error::NameError;

/// Storage of the full name mapping document.
///
/// Production: `JsonNameFile`
/// Testing: `InMemoryNameStore`
pub trait NameDocumentStore: Send + Sync {
    fn load(&self) -> Result<NameDocument, NameError>;

    fn save(&self, document: &NameDocument) -> Result<(), NameError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}
