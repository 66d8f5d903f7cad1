//! The persisted access-control aggregate.
//!
//! Pure data plus the membership rules; no I/O. The service layer wraps every
//! mutation here with locking, persistence and notification.
//!
//! ## Invariants
//!
//! - An identity is never both allowed and banned.
//! - A kind is never both allowed and disallowed.
//! - `admins` never maps an identity to an empty method set.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use serde::{Deserialize, Deserializer, Serialize};
use shared_types::{ContentId, IdentityKey, Kind};
use tracing::warn;

use super::permissions::{AdminMethod, MethodSet};
use crate::error::{AccessControlError, Subject};

/// Reason or report text attached to a moderation decision.
pub type Reason = String;

/// Everything the relay persists about who and what may act.
///
/// JSON field names match the on-disk `management.json` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccessControlState {
    #[serde(rename = "allowed_keys", default)]
    pub allowed_identities: BTreeMap<IdentityKey, Reason>,
    #[serde(rename = "banned_keys", default)]
    pub banned_identities: BTreeMap<IdentityKey, Reason>,
    #[serde(default)]
    pub allowed_kinds: BTreeSet<Kind>,
    #[serde(default)]
    pub disallowed_kinds: BTreeSet<Kind>,
    #[serde(rename = "blocked_ips", default)]
    pub blocked_addresses: BTreeMap<String, Reason>,
    #[serde(rename = "banned_events", default)]
    pub banned_content: BTreeMap<ContentId, Reason>,
    #[serde(rename = "moderation_events", default)]
    pub pending_moderation: BTreeMap<ContentId, Reason>,
    #[serde(default, deserialize_with = "known_admin_methods")]
    pub admins: BTreeMap<IdentityKey, MethodSet>,
}

/// Reads the admin table, skipping method names this relay does not serve.
/// An admin left with no known method is dropped.
fn known_admin_methods<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<IdentityKey, MethodSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<IdentityKey, Vec<String>>::deserialize(deserializer)?;
    let mut admins = BTreeMap::new();

    for (id, names) in raw {
        let mut methods = MethodSet::new();
        for name in names {
            match name.parse::<AdminMethod>() {
                Ok(method) => {
                    methods.insert(method);
                }
                Err(e) => warn!("[rg-01] Ignoring grant for admin {}: {}", id.as_str(), e),
            }
        }

        if methods.is_empty() {
            warn!("[rg-01] Dropping admin {} with no known methods", id.as_str());
        } else {
            admins.insert(id, methods);
        }
    }

    Ok(admins)
}

impl AccessControlState {
    // =========================================================================
    // Predicates (policy hot path)
    // =========================================================================

    pub fn is_identity_allowed(&self, id: &IdentityKey) -> bool {
        self.allowed_identities.contains_key(id)
    }

    pub fn is_identity_banned(&self, id: &IdentityKey) -> bool {
        self.banned_identities.contains_key(id)
    }

    pub fn is_kind_allowed(&self, kind: Kind) -> bool {
        self.allowed_kinds.contains(&kind)
    }

    pub fn is_kind_disallowed(&self, kind: Kind) -> bool {
        self.disallowed_kinds.contains(&kind)
    }

    pub fn is_address_blocked(&self, addr: &IpAddr) -> bool {
        self.blocked_addresses.contains_key(&addr.to_string())
    }

    pub fn is_content_banned(&self, id: &ContentId) -> bool {
        self.banned_content.contains_key(id)
    }

    pub fn admin_methods(&self, id: &IdentityKey) -> Option<&MethodSet> {
        self.admins.get(id)
    }

    // =========================================================================
    // Identities
    // =========================================================================

    pub fn allow_identity(&mut self, id: IdentityKey, reason: Reason) -> Result<(), AccessControlError> {
        if self.is_identity_allowed(&id) {
            return Err(AccessControlError::AlreadyAllowed(Subject::Identity(id)));
        }
        self.banned_identities.remove(&id);
        self.allowed_identities.insert(id, reason);
        Ok(())
    }

    /// Precondition for a ban, checked before any cascading delete runs.
    pub fn ensure_not_banned(&self, id: &IdentityKey) -> Result<(), AccessControlError> {
        if self.is_identity_banned(id) {
            return Err(AccessControlError::AlreadyBanned(Subject::Identity(id.clone())));
        }
        Ok(())
    }

    pub fn ban_identity(&mut self, id: IdentityKey, reason: Reason) -> Result<(), AccessControlError> {
        self.ensure_not_banned(&id)?;
        self.allowed_identities.remove(&id);
        self.banned_identities.insert(id, reason);
        Ok(())
    }

    // =========================================================================
    // Kinds
    // =========================================================================

    pub fn allow_kind(&mut self, kind: Kind) -> Result<(), AccessControlError> {
        if !self.allowed_kinds.insert(kind) {
            return Err(AccessControlError::AlreadyAllowed(Subject::Kind(kind)));
        }
        self.disallowed_kinds.remove(&kind);
        Ok(())
    }

    pub fn disallow_kind(&mut self, kind: Kind) -> Result<(), AccessControlError> {
        if !self.disallowed_kinds.insert(kind) {
            return Err(AccessControlError::AlreadyDisallowed(Subject::Kind(kind)));
        }
        self.allowed_kinds.remove(&kind);
        Ok(())
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    pub fn block_address(&mut self, addr: IpAddr, reason: Reason) -> Result<(), AccessControlError> {
        if self.is_address_blocked(&addr) {
            return Err(AccessControlError::AlreadyBlocked(Subject::Address(addr)));
        }
        self.blocked_addresses.insert(addr.to_string(), reason);
        Ok(())
    }

    pub fn unblock_address(&mut self, addr: IpAddr) -> Result<(), AccessControlError> {
        match self.blocked_addresses.remove(&addr.to_string()) {
            Some(_) => Ok(()),
            None => Err(AccessControlError::NotBlocked(Subject::Address(addr))),
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn ensure_content_not_banned(&self, id: &ContentId) -> Result<(), AccessControlError> {
        if self.is_content_banned(id) {
            return Err(AccessControlError::AlreadyBanned(Subject::Content(id.clone())));
        }
        Ok(())
    }

    pub fn ban_content(&mut self, id: ContentId, reason: Reason) -> Result<(), AccessControlError> {
        self.ensure_content_not_banned(&id)?;
        self.banned_content.insert(id, reason);
        Ok(())
    }

    /// Lenient report: a repeated report for the same content overwrites the text.
    pub fn record_report(&mut self, id: ContentId, report: Reason) {
        self.pending_moderation.insert(id, report);
    }

    /// Strict report: a repeated report for the same content is rejected.
    pub fn receive_report(&mut self, id: ContentId, report: Reason) -> Result<(), AccessControlError> {
        if self.pending_moderation.contains_key(&id) {
            return Err(AccessControlError::AlreadyReported(id));
        }
        self.pending_moderation.insert(id, report);
        Ok(())
    }

    // =========================================================================
    // Admins
    // =========================================================================

    /// Replace the method set granted to `id`.
    pub fn grant_admin(&mut self, id: IdentityKey, methods: MethodSet) -> Result<(), AccessControlError> {
        if methods.is_empty() {
            return Err(AccessControlError::EmptyMethodSet);
        }
        self.admins.insert(id, methods);
        Ok(())
    }

    /// Remove methods from `id`'s grant. Returns `true` when the entry was deleted.
    pub fn revoke_admin(&mut self, id: &IdentityKey, methods: &MethodSet) -> Result<bool, AccessControlError> {
        let granted = self
            .admins
            .get_mut(id)
            .ok_or_else(|| AccessControlError::NotAnAdmin(id.clone()))?;
        granted.retain(|m| !methods.contains(m));

        if granted.is_empty() {
            self.admins.remove(id);
            return Ok(true);
        }
        Ok(false)
    }

    /// Grant the wildcard to `id` unless it already has any grant.
    pub fn bootstrap_admin(&mut self, id: IdentityKey) -> bool {
        if self.admins.contains_key(&id) {
            return false;
        }
        self.admins.insert(id, AdminMethod::wildcard_set());
        true
    }
}
