//! # Runtime Adapters
//!
//! Port implementations owned by the binary rather than a subsystem.

pub mod delivery;
pub mod stats;

pub use delivery::LoggingDelivery;
pub use stats::ConnectionGauge;
