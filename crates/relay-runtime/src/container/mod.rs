//! # Subsystem Container
//!
//! Central container holding every subsystem instance with its adapters
//! injected.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, RelayConfig};
pub use subsystems::{ContainerError, HostCollaborators, RelayContainer};
