//! # Access-Control Service
//!
//! The store every other subsystem reads and the admin dispatcher mutates.
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns the single `AccessControlState` behind one async mutex
//! 2. Runs cascading content deletion before membership changes
//! 3. Writes the full state through `StatePersistence` before releasing the lock
//! 4. Emits a `Notice` after each successful change

mod store;

pub use store::{AccessControlDependencies, AccessControlStore};
