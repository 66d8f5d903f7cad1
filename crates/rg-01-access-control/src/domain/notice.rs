//! Human-readable notices emitted after successful state changes.

use std::net::IpAddr;

use shared_types::{ContentId, IdentityKey, Kind};

use super::permissions::MethodSet;

/// A state change worth telling the operators about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    IdentityAllowed { id: IdentityKey, reason: String },
    IdentityBanned { id: IdentityKey, reason: String },
    KindAllowed { kind: Kind },
    KindDisallowed { kind: Kind },
    AddressBlocked { addr: IpAddr, reason: String },
    AddressUnblocked { addr: IpAddr, reason: String },
    ContentBanned { id: ContentId, reason: String },
    AdminGranted {
        id: IdentityKey,
        granter: IdentityKey,
        methods: MethodSet,
    },
    AdminRevoked {
        id: IdentityKey,
        revoker: IdentityKey,
        methods: MethodSet,
        deleted: bool,
    },
    NameSet { name: String, id: IdentityKey },
    NameUnset { name: String },
}

fn method_list(methods: &MethodSet) -> String {
    let names: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
    format!("[{}]", names.join(" "))
}

impl Notice {
    /// Render the notice for delivery, naming the relay it happened on.
    pub fn render(&self, relay_url: &str) -> String {
        match self {
            Notice::IdentityAllowed { id, reason } => {
                format!("Pubkey {} is now allowed on relay {}\nReason: {}", id, relay_url, reason)
            }
            Notice::IdentityBanned { id, reason } => {
                format!("Pubkey {} is now banned on relay {}\nReason: {}", id, relay_url, reason)
            }
            Notice::KindAllowed { kind } => {
                format!("Kind {} is now allowed on relay {}", kind, relay_url)
            }
            Notice::KindDisallowed { kind } => {
                format!("Kind {} is now disallowed on relay {}", kind, relay_url)
            }
            Notice::AddressBlocked { addr, reason } => {
                format!("IP {} is now blocked on relay {}\nReason: {}", addr, relay_url, reason)
            }
            Notice::AddressUnblocked { addr, reason } => {
                format!("IP {} is now unblocked on relay {}\nReason: {}", addr, relay_url, reason)
            }
            Notice::ContentBanned { id, reason } => {
                format!("Event {} is now blocked on relay {}\nReason: {}", id, relay_url, reason)
            }
            Notice::AdminGranted { id, granter, methods } => format!(
                "New admin {} granted by {}\nMethods: {}",
                id,
                granter,
                method_list(methods)
            ),
            Notice::AdminRevoked {
                id,
                revoker,
                methods,
                deleted,
            } => format!(
                "Admin {} revoked by {}\nMethods: {}\nDeleted: {}",
                id,
                revoker,
                method_list(methods),
                deleted
            ),
            Notice::NameSet { name, id } => {
                format!("New NIP-05 has been set.\nName: {}\nPubkey: {}", name, id)
            }
            Notice::NameUnset { name } => format!("NIP-05 has been unset.\nName: {}", name),
        }
    }
}
