//! Policy outcomes.

use std::fmt;

/// Why a unit of work was turned away.
///
/// The `Display` text is what the transport sends back to the client, so the
/// machine-readable prefix (`blocked:`, `restricted:` ...) is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    IdentityBanned,
    IdentityNotAllowed,
    KindDisallowed,
    KindNotAllowed,
    ContentBanned,
    AddressBlocked,
    GiftWrapAuthRequired,
    GiftWrapForeignFilter,
    InvalidPTag,
    GiftWrapNotRecipient,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::IdentityBanned => "blocked: you are banned",
            RejectReason::IdentityNotAllowed => "restricted: you are not allowed",
            RejectReason::KindDisallowed => "blocked: kind not allowed",
            RejectReason::KindNotAllowed => "restricted: kind not allowed",
            RejectReason::ContentBanned => "blocked: event is banned",
            RejectReason::AddressBlocked => "blocked: this address is blocked",
            RejectReason::GiftWrapAuthRequired => {
                "auth-required: you are reading gift-wrapped events"
            }
            RejectReason::GiftWrapForeignFilter => {
                "error: you can read your gift-wrapped events only"
            }
            RejectReason::InvalidPTag => "error: invalid p tag",
            RejectReason::GiftWrapNotRecipient => {
                "restricted: you can only read your own gift-wrapped events"
            }
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept or reject, with the reason on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Accept,
    Reject(RejectReason),
}

impl PolicyDecision {
    pub fn is_rejected(&self) -> bool {
        matches!(self, PolicyDecision::Reject(_))
    }

    /// Client-facing reason; empty on accept.
    pub fn message(&self) -> &'static str {
        match self {
            PolicyDecision::Accept => "",
            PolicyDecision::Reject(reason) => reason.as_str(),
        }
    }
}

/// Transport status to report alongside an upload decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusHint {
    Ok,
    Forbidden,
}

impl StatusHint {
    /// Equivalent HTTP status code.
    pub fn http_code(self) -> u16 {
        match self {
            StatusHint::Ok => 200,
            StatusHint::Forbidden => 403,
        }
    }
}

/// Outcome of an upload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadDecision {
    pub decision: PolicyDecision,
    pub status: StatusHint,
}

impl UploadDecision {
    pub fn accept() -> Self {
        Self {
            decision: PolicyDecision::Accept,
            status: StatusHint::Ok,
        }
    }

    pub fn forbid(reason: RejectReason) -> Self {
        Self {
            decision: PolicyDecision::Reject(reason),
            status: StatusHint::Forbidden,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.decision.is_rejected()
    }
}
