//! Domain layer for Access Control
//!
//! Pure state and rules; no I/O.

pub mod notice;
pub mod permissions;
pub mod state;

pub use notice::Notice;
pub use permissions::{permits, AdminMethod, MethodSet, UnknownMethod};
pub use state::{AccessControlState, Reason};
