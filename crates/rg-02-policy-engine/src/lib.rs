//! # Policy Engine (rg-02)
//!
//! Decides, for every inbound message, upload and subscription filter,
//! whether the relay accepts it. Holds no state of its own; every decision
//! is a read of the Access-Control store (rg-01).
//!
//! Policy never errors: each check degrades to a reject with a client-facing
//! reason.
//!
//! ## Crate Structure
//!
//! - `domain/` - Config, decision types, pure rule functions
//! - `service/` - `PolicyEngine`, bound to a shared `AccessControlStore`

pub mod domain;
pub mod service;

pub use domain::rules;
pub use domain::{PolicyConfig, PolicyDecision, RejectReason, StatusHint, UploadDecision};
pub use service::PolicyEngine;
