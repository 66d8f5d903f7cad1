pub mod authorize;
pub mod command;
pub mod response;

pub use authorize::authorize;
pub use command::{AdminCommand, AdminRequest};
pub use response::{
    AdminResponse, ListedAddress, ListedAdmin, ListedEvent, ListedIdentity, RelayStats,
};
