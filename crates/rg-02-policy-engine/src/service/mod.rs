//! # Policy Engine Service
//!
//! Binds the pure rules to the shared `AccessControlStore`. Every evaluation
//! reads the state through one locked `read`, so a decision never sees a
//! half-applied admin command.

use std::sync::Arc;

use rg_01_access_control::{AccessControlError, AccessControlStore};
use shared_types::{IdentityKey, Message, RequestContext, SubscriptionFilter};
use tracing::debug;

use crate::domain::rules;
use crate::domain::{PolicyConfig, PolicyDecision, UploadDecision};

/// Accept/reject decisions for everything the relay takes in.
pub struct PolicyEngine {
    store: Arc<AccessControlStore>,
    config: PolicyConfig,
}

impl PolicyEngine {
    pub fn new(store: Arc<AccessControlStore>, config: PolicyConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub async fn evaluate_incoming_message(
        &self,
        ctx: &RequestContext,
        msg: &Message,
    ) -> PolicyDecision {
        let decision = self
            .store
            .read(|state| rules::check_message(state, &self.config, ctx, msg))
            .await;

        if let PolicyDecision::Reject(reason) = decision {
            debug!("[rg-02] Rejected event {} from {}: {}", msg.id, msg.author, reason);
        }
        decision
    }

    /// `size` and `extension` are accepted for the transport's benefit; no
    /// rule looks at them.
    pub async fn evaluate_upload_request(
        &self,
        ctx: &RequestContext,
        actor: &IdentityKey,
        _size: u64,
        _extension: &str,
    ) -> UploadDecision {
        let decision = self
            .store
            .read(|state| rules::check_upload(state, &self.config, ctx, actor))
            .await;

        if let PolicyDecision::Reject(reason) = decision.decision {
            debug!("[rg-02] Rejected upload from {}: {}", actor, reason);
        }
        decision
    }

    /// Stateless; kept on the engine so the transport has one entry point.
    pub fn evaluate_subscription_filter(
        &self,
        ctx: &RequestContext,
        filter: &SubscriptionFilter,
    ) -> PolicyDecision {
        rules::check_filter(ctx, filter)
    }

    /// Hook for after a message is durably stored.
    ///
    /// Queues every piece of content a report message points at for
    /// moderation. Returns the number of entries recorded.
    pub async fn on_message_stored(&self, msg: &Message) -> Result<usize, AccessControlError> {
        let reported = rules::reported_content(msg);
        for id in &reported {
            self.store
                .record_for_report(id.clone(), msg.content.clone())
                .await?;
        }

        if !reported.is_empty() {
            debug!("[rg-02] Report {} flagged {} events", msg.id, reported.len());
        }
        Ok(reported.len())
    }
}
