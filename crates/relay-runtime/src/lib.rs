//! # Relay Runtime Library
//!
//! Wiring for the relay moderation core. The `relay-guard` binary in
//! `main.rs` is a thin shell over `RelayRuntime`; host relays embed the
//! library and plug their own delivery and content stores in through
//! `HostCollaborators`.
//!
//! ## Modular Structure
//!
//! - `container/` - `RelayConfig` and the subsystem container
//! - `adapters/` - Log-backed notification delivery, connection gauge
//! - `runtime` - Background tasks, fatal-error handling, shutdown

pub mod adapters;
pub mod container;
pub mod runtime;

pub use adapters::{ConnectionGauge, LoggingDelivery};
pub use container::{ConfigError, ContainerError, HostCollaborators, RelayConfig, RelayContainer};
pub use runtime::{RelayRuntime, SHUTDOWN_GRACE};
