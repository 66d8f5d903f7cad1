//! Administrative method identifiers.
//!
//! Admin grants are stored as sets of these identifiers. The set is closed:
//! an unknown method name never parses, so a typo can't grant anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every administrative operation exposed to remote callers, plus the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdminMethod {
    #[serde(rename = "*")]
    Wildcard,
    #[serde(rename = "allowpubkey")]
    AllowPubkey,
    #[serde(rename = "banpubkey")]
    BanPubkey,
    #[serde(rename = "listallowedpubkeys")]
    ListAllowedPubkeys,
    #[serde(rename = "listbannedpubkeys")]
    ListBannedPubkeys,
    #[serde(rename = "allowkind")]
    AllowKind,
    #[serde(rename = "disallowkind")]
    DisallowKind,
    #[serde(rename = "listallowedkinds")]
    ListAllowedKinds,
    #[serde(rename = "listdisallowedkinds")]
    ListDisallowedKinds,
    #[serde(rename = "blockip")]
    BlockIp,
    #[serde(rename = "unblockip")]
    UnblockIp,
    #[serde(rename = "listblockedips")]
    ListBlockedIps,
    #[serde(rename = "banevent")]
    BanEvent,
    #[serde(rename = "listbannedevents")]
    ListBannedEvents,
    #[serde(rename = "listeventsneedingmoderation")]
    ListEventsNeedingModeration,
    #[serde(rename = "grantadmin")]
    GrantAdmin,
    #[serde(rename = "revokeadmin")]
    RevokeAdmin,
    #[serde(rename = "listadmins")]
    ListAdmins,
    #[serde(rename = "stats")]
    Stats,
    #[serde(rename = "setnip05")]
    SetNip05,
    #[serde(rename = "unsetnip05")]
    UnsetNip05,
}

/// A set of granted methods.
pub type MethodSet = BTreeSet<AdminMethod>;

impl AdminMethod {
    /// Every concrete (non-wildcard) method.
    pub const ALL: &'static [AdminMethod] = &[
        AdminMethod::AllowPubkey,
        AdminMethod::BanPubkey,
        AdminMethod::ListAllowedPubkeys,
        AdminMethod::ListBannedPubkeys,
        AdminMethod::AllowKind,
        AdminMethod::DisallowKind,
        AdminMethod::ListAllowedKinds,
        AdminMethod::ListDisallowedKinds,
        AdminMethod::BlockIp,
        AdminMethod::UnblockIp,
        AdminMethod::ListBlockedIps,
        AdminMethod::BanEvent,
        AdminMethod::ListBannedEvents,
        AdminMethod::ListEventsNeedingModeration,
        AdminMethod::GrantAdmin,
        AdminMethod::RevokeAdmin,
        AdminMethod::ListAdmins,
        AdminMethod::Stats,
        AdminMethod::SetNip05,
        AdminMethod::UnsetNip05,
    ];

    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            AdminMethod::Wildcard => "*",
            AdminMethod::AllowPubkey => "allowpubkey",
            AdminMethod::BanPubkey => "banpubkey",
            AdminMethod::ListAllowedPubkeys => "listallowedpubkeys",
            AdminMethod::ListBannedPubkeys => "listbannedpubkeys",
            AdminMethod::AllowKind => "allowkind",
            AdminMethod::DisallowKind => "disallowkind",
            AdminMethod::ListAllowedKinds => "listallowedkinds",
            AdminMethod::ListDisallowedKinds => "listdisallowedkinds",
            AdminMethod::BlockIp => "blockip",
            AdminMethod::UnblockIp => "unblockip",
            AdminMethod::ListBlockedIps => "listblockedips",
            AdminMethod::BanEvent => "banevent",
            AdminMethod::ListBannedEvents => "listbannedevents",
            AdminMethod::ListEventsNeedingModeration => "listeventsneedingmoderation",
            AdminMethod::GrantAdmin => "grantadmin",
            AdminMethod::RevokeAdmin => "revokeadmin",
            AdminMethod::ListAdmins => "listadmins",
            AdminMethod::Stats => "stats",
            AdminMethod::SetNip05 => "setnip05",
            AdminMethod::UnsetNip05 => "unsetnip05",
        }
    }

    /// A set containing only the wildcard.
    pub fn wildcard_set() -> MethodSet {
        BTreeSet::from([AdminMethod::Wildcard])
    }
}

/// Whether a granted set permits the given method.
pub fn permits(granted: &MethodSet, method: AdminMethod) -> bool {
    granted.contains(&AdminMethod::Wildcard) || granted.contains(&method)
}

impl fmt::Display for AdminMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a method name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown method {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for AdminMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(AdminMethod::Wildcard);
        }
        AdminMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
