//! # Shared Types Crate
//!
//! Relay primitives used by every moderation subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, content ids and kinds are defined
//!   once here so the store, policy engine and dispatcher agree on them.
//! - **Opaque keys**: identities and content ids are carried as their hex text;
//!   well-formedness is checked only where a subsystem requires it.
//! - **Context, not payload**: who is asking and from where travels in
//!   `RequestContext`, never inside the message itself.

pub mod context;
pub mod entities;
pub mod filter;
pub mod fs;

pub use context::RequestContext;
pub use entities::*;
pub use filter::SubscriptionFilter;
