//! # Name Resolution (rg-04)
//!
//! NIP-05 style lookups: a human-readable name resolves to an identity key
//! plus optional relay hints.
//!
//! ## Cache Lifecycle
//!
//! ```text
//! resolve(name) ──hit──→ refresh last_accessed_at ──→ cached document
//!        │
//!        └──miss──→ load nip05.json ──→ cache ──→ document
//!
//! sweeper (every 6h) ──→ evict entries idle >= 1h
//! ```
//!
//! ## Crate Structure
//!
//! - `domain/` - Name document, cache entries and eviction rule
//! - `ports/` - `NameDocumentStore`, `TimeSource`
//! - `adapters/` - JSON file, in-memory store, clocks
//! - `service/` - `NameResolver` and its background sweeper

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryNameStore, JsonNameFile, ManualClock, SystemClock};
pub use domain::{
    NameCache, NameCacheConfig, NameDocument, DEFAULT_IDLE_THRESHOLD, DEFAULT_SWEEP_INTERVAL,
};
pub use error::NameError;
pub use ports::{NameDocumentStore, TimeSource};
pub use service::NameResolver;
