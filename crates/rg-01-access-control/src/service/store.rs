use std::net::IpAddr;
use std::sync::Arc;

use shared_types::{ContentId, IdentityKey, Kind};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::{AccessControlState, MethodSet, Notice, Reason};
use crate::error::{AccessControlError, ContentStoreError, StateFileError};
use crate::ports::{ContentQuery, ContentStore, Notifier, StatePersistence};

/// External collaborators of the store.
pub struct AccessControlDependencies {
    pub persistence: Arc<dyn StatePersistence>,
    pub notifier: Arc<dyn Notifier>,
    /// Every store that holds relayed content. Bans delete from all of them.
    pub content_stores: Vec<Arc<dyn ContentStore>>,
}

/// The Access-Control store.
///
/// All reads and writes go through one lock. Mutations hold it across the
/// cascading content deletion and the durable write, so observers never see
/// a membership change that is not on disk.
pub struct AccessControlStore {
    state: Mutex<AccessControlState>,
    persistence: Arc<dyn StatePersistence>,
    notifier: Arc<dyn Notifier>,
    content_stores: Vec<Arc<dyn ContentStore>>,
}

impl AccessControlStore {
    /// Load the saved state, or create and save an empty one.
    pub fn open(deps: AccessControlDependencies) -> Result<Self, StateFileError> {
        let state = match deps.persistence.load()? {
            Some(state) => state,
            None => {
                info!("[rg-01] Initialising empty access-control state");
                let state = AccessControlState::default();
                deps.persistence.save(&state)?;
                state
            }
        };

        info!(
            "[rg-01] Access control ready: {} allowed, {} banned, {} admins, {} content stores",
            state.allowed_identities.len(),
            state.banned_identities.len(),
            state.admins.len(),
            deps.content_stores.len()
        );

        Ok(Self {
            state: Mutex::new(state),
            persistence: deps.persistence,
            notifier: deps.notifier,
            content_stores: deps.content_stores,
        })
    }

    /// Run `f` against the state under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&AccessControlState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Owned copy of the whole state.
    pub async fn snapshot(&self) -> AccessControlState {
        self.state.lock().await.clone()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn persist(&self, state: &AccessControlState) -> Result<(), AccessControlError> {
        self.persistence.save(state).map_err(|e| {
            error!("[rg-01] Can't persist access-control state: {}", e);
            AccessControlError::Persistence(e)
        })
    }

    /// Apply `change` to a copy of `state`, persist the copy, then swap it in.
    ///
    /// On any error `state` is left exactly as it was on disk.
    fn commit<R>(
        &self,
        state: &mut AccessControlState,
        change: impl FnOnce(&mut AccessControlState) -> Result<R, AccessControlError>,
    ) -> Result<R, AccessControlError> {
        let mut next = state.clone();
        let outcome = change(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(outcome)
    }

    /// Delete everything matching `query` from every content store.
    ///
    /// Stops at the first error; items already deleted stay deleted.
    async fn cascade_delete(&self, query: &ContentQuery) -> Result<usize, ContentStoreError> {
        let mut deleted = 0;
        for source in &self.content_stores {
            let found = source.query(query).await?;
            for message in &found {
                for target in &self.content_stores {
                    target.delete(message).await?;
                }
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    // =========================================================================
    // Identities
    // =========================================================================

    pub async fn allow_identity(
        &self,
        id: IdentityKey,
        reason: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let reason = reason.into();
        let mut state = self.state.lock().await;

        self.commit(&mut state, |next| next.allow_identity(id.clone(), reason.clone()))?;

        info!("[rg-01] Allowed pubkey {}", id);
        self.notifier.notify(Notice::IdentityAllowed { id, reason });
        Ok(())
    }

    pub async fn ban_identity(
        &self,
        id: IdentityKey,
        reason: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let reason = reason.into();
        let mut state = self.state.lock().await;

        state.ensure_not_banned(&id)?;

        let deleted = self
            .cascade_delete(&ContentQuery::ByAuthor(id.clone()))
            .await
            .map_err(|e| {
                warn!("[rg-01] Ban of {} aborted: {}", id, e);
                e
            })?;
        debug!("[rg-01] Deleted {} events by {}", deleted, id);

        self.commit(&mut state, |next| next.ban_identity(id.clone(), reason.clone()))?;

        info!("[rg-01] Banned pubkey {}", id);
        self.notifier.notify(Notice::IdentityBanned { id, reason });
        Ok(())
    }

    // =========================================================================
    // Kinds
    // =========================================================================

    pub async fn allow_kind(&self, kind: Kind) -> Result<(), AccessControlError> {
        let mut state = self.state.lock().await;

        self.commit(&mut state, |next| next.allow_kind(kind))?;

        info!("[rg-01] Allowed kind {}", kind);
        self.notifier.notify(Notice::KindAllowed { kind });
        Ok(())
    }

    pub async fn disallow_kind(&self, kind: Kind) -> Result<(), AccessControlError> {
        let mut state = self.state.lock().await;

        self.commit(&mut state, |next| next.disallow_kind(kind))?;

        info!("[rg-01] Disallowed kind {}", kind);
        self.notifier.notify(Notice::KindDisallowed { kind });
        Ok(())
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    pub async fn block_address(
        &self,
        addr: IpAddr,
        reason: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let reason = reason.into();
        let mut state = self.state.lock().await;

        self.commit(&mut state, |next| next.block_address(addr, reason.clone()))?;

        info!("[rg-01] Blocked ip {}", addr);
        self.notifier.notify(Notice::AddressBlocked { addr, reason });
        Ok(())
    }

    pub async fn unblock_address(
        &self,
        addr: IpAddr,
        reason: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let reason = reason.into();
        let mut state = self.state.lock().await;

        self.commit(&mut state, |next| next.unblock_address(addr))?;

        info!("[rg-01] Unblocked ip {}", addr);
        self.notifier.notify(Notice::AddressUnblocked { addr, reason });
        Ok(())
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub async fn ban_content(
        &self,
        id: ContentId,
        reason: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let reason = reason.into();
        let mut state = self.state.lock().await;

        state.ensure_content_not_banned(&id)?;

        self.cascade_delete(&ContentQuery::ById(id.clone()))
            .await
            .map_err(|e| {
                warn!("[rg-01] Ban of event {} aborted: {}", id, e);
                e
            })?;

        self.commit(&mut state, |next| next.ban_content(id.clone(), reason.clone()))?;

        info!("[rg-01] Banned event {}", id);
        self.notifier.notify(Notice::ContentBanned { id, reason });
        Ok(())
    }

    /// Queue content for moderator review, overwriting an earlier report.
    pub async fn record_for_report(
        &self,
        id: ContentId,
        report: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let mut state = self.state.lock().await;

        let report = report.into();
        self.commit(&mut state, |next| {
            next.record_report(id.clone(), report);
            Ok(())
        })?;

        debug!("[rg-01] Event {} queued for moderation", id);
        Ok(())
    }

    /// Queue content for moderator review; a second report is rejected.
    pub async fn receive_report(
        &self,
        id: ContentId,
        report: impl Into<Reason>,
    ) -> Result<(), AccessControlError> {
        let mut state = self.state.lock().await;

        let report = report.into();
        self.commit(&mut state, |next| next.receive_report(id.clone(), report))?;

        debug!("[rg-01] Report received for {}", id);
        Ok(())
    }

    // =========================================================================
    // Admins
    // =========================================================================

    pub async fn grant_admin(
        &self,
        granter: &IdentityKey,
        id: IdentityKey,
        methods: MethodSet,
    ) -> Result<(), AccessControlError> {
        let mut state = self.state.lock().await;

        self.commit(&mut state, |next| next.grant_admin(id.clone(), methods.clone()))?;

        info!("[rg-01] {} granted admin methods to {}", granter, id);
        self.notifier.notify(Notice::AdminGranted {
            id,
            granter: granter.clone(),
            methods,
        });
        Ok(())
    }

    /// Returns `true` when the admin entry was removed entirely.
    pub async fn revoke_admin(
        &self,
        revoker: &IdentityKey,
        id: IdentityKey,
        methods: MethodSet,
    ) -> Result<bool, AccessControlError> {
        let mut state = self.state.lock().await;

        let deleted = self.commit(&mut state, |next| next.revoke_admin(&id, &methods))?;

        info!("[rg-01] {} revoked admin methods from {}", revoker, id);
        self.notifier.notify(Notice::AdminRevoked {
            id,
            revoker: revoker.clone(),
            methods,
            deleted,
        });
        Ok(deleted)
    }

    /// Give each configured admin the wildcard unless it already has a grant.
    ///
    /// Returns the number of identities added.
    pub async fn bootstrap_admins(&self, ids: &[IdentityKey]) -> Result<usize, AccessControlError> {
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        let added = ids
            .iter()
            .filter(|id| next.bootstrap_admin((*id).clone()))
            .count();

        if added > 0 {
            self.persist(&next)?;
            *state = next;
            info!("[rg-01] Bootstrapped {} admins", added);
        }
        Ok(added)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    pub async fn list_allowed_identities(&self) -> Vec<(IdentityKey, Reason)> {
        self.read(|s| s.allowed_identities.clone().into_iter().collect())
            .await
    }

    pub async fn list_banned_identities(&self) -> Vec<(IdentityKey, Reason)> {
        self.read(|s| s.banned_identities.clone().into_iter().collect())
            .await
    }

    pub async fn list_allowed_kinds(&self) -> Vec<Kind> {
        self.read(|s| s.allowed_kinds.iter().copied().collect()).await
    }

    pub async fn list_disallowed_kinds(&self) -> Vec<Kind> {
        self.read(|s| s.disallowed_kinds.iter().copied().collect())
            .await
    }

    pub async fn list_blocked_addresses(&self) -> Vec<(String, Reason)> {
        self.read(|s| s.blocked_addresses.clone().into_iter().collect())
            .await
    }

    pub async fn list_banned_content(&self) -> Vec<(ContentId, Reason)> {
        self.read(|s| s.banned_content.clone().into_iter().collect())
            .await
    }

    pub async fn list_pending_moderation(&self) -> Vec<(ContentId, Reason)> {
        self.read(|s| s.pending_moderation.clone().into_iter().collect())
            .await
    }

    pub async fn list_admins(&self) -> Vec<(IdentityKey, MethodSet)> {
        self.read(|s| s.admins.clone().into_iter().collect()).await
    }

    /// Methods granted to `id`, if it is an admin.
    pub async fn admin_methods(&self, id: &IdentityKey) -> Option<MethodSet> {
        self.read(|s| s.admin_methods(id).cloned()).await
    }
}
