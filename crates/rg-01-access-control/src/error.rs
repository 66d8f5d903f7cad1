//! Error types for the Access-Control subsystem

use shared_types::{ContentId, IdentityKey, Kind};
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

/// The thing a redundant or missing-entry error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Identity(IdentityKey),
    Kind(Kind),
    Address(IpAddr),
    Content(ContentId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Identity(key) => write!(f, "pubkey {}", key),
            Subject::Kind(kind) => write!(f, "kind {}", kind),
            Subject::Address(addr) => write!(f, "ip {}", addr),
            Subject::Content(id) => write!(f, "event {}", id),
        }
    }
}

/// Coarse classification of failures, as surfaced to administrative callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Idempotency violation; no state change.
    RedundantOperation,
    /// The entry to act on does not exist; no state change.
    NotFound,
    /// Malformed input; no state change.
    Validation,
    /// A cascading content-store operation failed; membership unchanged.
    DependentOperationFailure,
    /// The durable write failed; fatal to the process.
    PersistenceFailure,
    /// The caller may not run the command.
    Unauthorized,
}

/// Errors from access-control store operations.
#[derive(Debug, Error)]
pub enum AccessControlError {
    #[error("{0} is already allowed")]
    AlreadyAllowed(Subject),

    #[error("{0} is already banned")]
    AlreadyBanned(Subject),

    #[error("{0} is already disallowed")]
    AlreadyDisallowed(Subject),

    #[error("{0} is already blocked")]
    AlreadyBlocked(Subject),

    #[error("{0} is not blocked")]
    NotBlocked(Subject),

    #[error("already received a report for event {0}")]
    AlreadyReported(ContentId),

    #[error("admin method set can't be empty")]
    EmptyMethodSet,

    #[error("pubkey {0} is not in the admins list")]
    NotAnAdmin(IdentityKey),

    #[error("content store error: {0}")]
    ContentStore(#[from] ContentStoreError),

    #[error("persistence error: {0}")]
    Persistence(#[from] StateFileError),
}

impl AccessControlError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyAllowed(_)
            | Self::AlreadyBanned(_)
            | Self::AlreadyDisallowed(_)
            | Self::AlreadyBlocked(_)
            | Self::AlreadyReported(_) => ErrorClass::RedundantOperation,
            Self::NotBlocked(_) | Self::NotAnAdmin(_) => ErrorClass::NotFound,
            Self::EmptyMethodSet => ErrorClass::Validation,
            Self::ContentStore(_) => ErrorClass::DependentOperationFailure,
            Self::Persistence(_) => ErrorClass::PersistenceFailure,
        }
    }

    /// In-memory state may now diverge from disk; the process must stop.
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::PersistenceFailure
    }
}

/// Errors from the durable state file.
#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("can't encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from a registered content store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentStoreError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

/// Errors from the notification transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("no route to recipient {0}")]
    NoRoute(IdentityKey),

    #[error("transport error: {0}")]
    Transport(String),
}
