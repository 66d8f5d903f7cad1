//! # Admin Dispatch (rg-03)
//!
//! The management surface of the relay. Each identity in the admin list
//! holds a set of methods it may call; `*` grants all of them.
//!
//! ## Flow
//!
//! ```text
//! {method, params} ──from_request()──→ AdminCommand
//!                                          │
//!                               authorize(admins, caller, method)
//!                                          │
//!             ┌────────────────────────────┼──────────────────┐
//!             ↓                            ↓                  ↓
//!     AccessControlStore (1)        NameResolver (4)      StatsSource
//! ```
//!
//! ## Crate Structure
//!
//! - `domain/` - Commands, responses, the permission gate
//! - `ports/` - `StatsSource`
//! - `service/` - `AdminDispatcher`

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{authorize, AdminCommand, AdminRequest, AdminResponse, RelayStats};
pub use error::DispatchError;
pub use ports::StatsSource;
pub use rg_01_access_control::{AdminMethod, ErrorClass, MethodSet};
pub use service::{AdminDispatchDependencies, AdminDispatcher, NAME_CHANGE_OK};
