//! # Policy Rules
//!
//! Pure decision functions over a borrowed `AccessControlState`.
//!
//! ## Message precedence ("who, then what, then where")
//!
//! 1. banned identity
//! 2. identity allow-list
//! 3. disallowed kind
//! 4. kind allow-list
//! 5. banned content id
//! 6. blocked source address
//!
//! The first matching rule wins.

use rg_01_access_control::AccessControlState;
use shared_types::{ContentId, IdentityKey, Kind, Message, RequestContext, SubscriptionFilter, HEX_KEY_LEN};

use super::config::PolicyConfig;
use super::decision::{PolicyDecision, RejectReason, UploadDecision};

const P_TAG: &str = "#p";

fn check_identity(
    state: &AccessControlState,
    config: &PolicyConfig,
    id: &IdentityKey,
) -> Option<RejectReason> {
    if state.is_identity_banned(id) {
        return Some(RejectReason::IdentityBanned);
    }
    if config.identity_allow_list && !state.is_identity_allowed(id) {
        return Some(RejectReason::IdentityNotAllowed);
    }
    None
}

fn check_address(state: &AccessControlState, ctx: &RequestContext) -> Option<RejectReason> {
    ctx.remote_addr
        .filter(|addr| state.is_address_blocked(addr))
        .map(|_| RejectReason::AddressBlocked)
}

/// Decide whether an inbound message may be accepted.
pub fn check_message(
    state: &AccessControlState,
    config: &PolicyConfig,
    ctx: &RequestContext,
    msg: &Message,
) -> PolicyDecision {
    if let Some(reason) = check_identity(state, config, &msg.author) {
        return PolicyDecision::Reject(reason);
    }

    if state.is_kind_disallowed(msg.kind) {
        return PolicyDecision::Reject(RejectReason::KindDisallowed);
    }
    if config.kind_allow_list && !state.is_kind_allowed(msg.kind) {
        return PolicyDecision::Reject(RejectReason::KindNotAllowed);
    }

    if state.is_content_banned(&msg.id) {
        return PolicyDecision::Reject(RejectReason::ContentBanned);
    }

    match check_address(state, ctx) {
        Some(reason) => PolicyDecision::Reject(reason),
        None => PolicyDecision::Accept,
    }
}

/// Decide whether `actor` may upload a blob. Kinds play no part.
pub fn check_upload(
    state: &AccessControlState,
    config: &PolicyConfig,
    ctx: &RequestContext,
    actor: &IdentityKey,
) -> UploadDecision {
    check_identity(state, config, actor)
        .or_else(|| check_address(state, ctx))
        .map(UploadDecision::forbid)
        .unwrap_or_else(UploadDecision::accept)
}

/// Gift-wrapped messages may only be read by their recipient.
///
/// Filters that don't ask for the gift-wrap kind are always accepted.
pub fn check_filter(ctx: &RequestContext, filter: &SubscriptionFilter) -> PolicyDecision {
    if !filter.requests_kind(Kind::GIFT_WRAP) {
        return PolicyDecision::Accept;
    }

    let Some(caller) = ctx.authenticated.as_ref() else {
        return PolicyDecision::Reject(RejectReason::GiftWrapAuthRequired);
    };

    if filter.tags.len() != 1 {
        return PolicyDecision::Reject(RejectReason::GiftWrapForeignFilter);
    }

    let recipients = filter.tag_values(P_TAG);
    if recipients.len() < 2 {
        return PolicyDecision::Reject(RejectReason::InvalidPTag);
    }

    if recipients[1] != caller.as_str() {
        return PolicyDecision::Reject(RejectReason::GiftWrapNotRecipient);
    }

    PolicyDecision::Accept
}

/// Content ids referenced by a report message, in tag order.
///
/// Only `e` tags whose value is a full-length id count.
pub fn reported_content(msg: &Message) -> Vec<ContentId> {
    if msg.kind != Kind::REPORTING {
        return Vec::new();
    }
    msg.tag_values("e")
        .filter(|value| value.len() == HEX_KEY_LEN)
        .map(ContentId::from)
        .collect()
}
