//! Command results, serialized in the management API's result shapes.

use rg_01_access_control::MethodSet;
use serde::Serialize;
use shared_types::{ContentId, IdentityKey, Kind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedIdentity {
    pub pubkey: IdentityKey,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedAddress {
    pub ip: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedEvent {
    pub id: ContentId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedAdmin {
    pub pubkey: IdentityKey,
    pub methods: MethodSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayStats {
    pub num_connections: u64,
    /// Seconds since the relay started.
    pub uptime: f64,
}

/// Result of one admin command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdminResponse {
    /// Mutation succeeded; serializes as `true`.
    Done(bool),
    Identities(Vec<ListedIdentity>),
    Kinds(Vec<Kind>),
    Addresses(Vec<ListedAddress>),
    Events(Vec<ListedEvent>),
    Admins(Vec<ListedAdmin>),
    Stats(RelayStats),
    /// Name mapping changes reply with a plain status string.
    Message(String),
}

impl AdminResponse {
    pub fn done() -> Self {
        AdminResponse::Done(true)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
