//! # Admin Dispatcher Service
//!
//! Gate, then execute. Every command is authorized against the current
//! admin grants before it touches the store, the name resolver or stats.

use std::sync::Arc;

use rg_01_access_control::{AccessControlStore, Notice, Notifier};
use rg_04_name_resolution::NameResolver;
use shared_types::IdentityKey;
use tracing::{error, info, warn};

use crate::domain::{
    authorize, AdminCommand, AdminRequest, AdminResponse, ListedAddress, ListedAdmin, ListedEvent,
    ListedIdentity, RelayStats,
};
use crate::error::DispatchError;
use crate::ports::StatsSource;

/// Status string returned by name mapping commands.
pub const NAME_CHANGE_OK: &str = "successful";

/// External collaborators of the dispatcher.
pub struct AdminDispatchDependencies {
    pub store: Arc<AccessControlStore>,
    pub names: Arc<NameResolver>,
    pub stats: Arc<dyn StatsSource>,
    /// Notices for name mapping changes; the store notifies for its own.
    pub notifier: Arc<dyn Notifier>,
}

pub struct AdminDispatcher {
    store: Arc<AccessControlStore>,
    names: Arc<NameResolver>,
    stats: Arc<dyn StatsSource>,
    notifier: Arc<dyn Notifier>,
}

impl AdminDispatcher {
    pub fn new(deps: AdminDispatchDependencies) -> Self {
        Self {
            store: deps.store,
            names: deps.names,
            stats: deps.stats,
            notifier: deps.notifier,
        }
    }

    /// Decode and run a generic request.
    ///
    /// Callers with no grant at all are turned away before their params are
    /// looked at.
    pub async fn handle(
        &self,
        caller: &IdentityKey,
        request: &AdminRequest,
    ) -> Result<AdminResponse, DispatchError> {
        if self.store.admin_methods(caller).await.is_none() {
            warn!("[rg-03] Rejected {} from non-admin {}", request.method, caller);
            return Err(DispatchError::NotAnAdmin(caller.clone()));
        }

        let command = AdminCommand::from_request(&request.method, &request.params)?;
        self.dispatch(caller, command).await
    }

    pub async fn dispatch(
        &self,
        caller: &IdentityKey,
        command: AdminCommand,
    ) -> Result<AdminResponse, DispatchError> {
        let method = command.method();
        self.store
            .read(|state| authorize(&state.admins, caller, method))
            .await
            .map_err(|e| {
                warn!("[rg-03] {}", e);
                e
            })?;

        info!("[rg-03] {} called {}", caller, method);
        let response = self.execute(caller, command).await;

        if let Err(e) = &response {
            if e.is_fatal() {
                error!("[rg-03] {} failed fatally: {}", method, e);
            }
        }
        response
    }

    async fn execute(
        &self,
        caller: &IdentityKey,
        command: AdminCommand,
    ) -> Result<AdminResponse, DispatchError> {
        let response = match command {
            AdminCommand::AllowPubkey { id, reason } => {
                self.store.allow_identity(id, reason).await?;
                AdminResponse::done()
            }
            AdminCommand::BanPubkey { id, reason } => {
                self.store.ban_identity(id, reason).await?;
                AdminResponse::done()
            }
            AdminCommand::ListAllowedPubkeys => {
                identities(self.store.list_allowed_identities().await)
            }
            AdminCommand::ListBannedPubkeys => {
                identities(self.store.list_banned_identities().await)
            }
            AdminCommand::AllowKind(kind) => {
                self.store.allow_kind(kind).await?;
                AdminResponse::done()
            }
            AdminCommand::DisallowKind(kind) => {
                self.store.disallow_kind(kind).await?;
                AdminResponse::done()
            }
            AdminCommand::ListAllowedKinds => {
                AdminResponse::Kinds(self.store.list_allowed_kinds().await)
            }
            AdminCommand::ListDisallowedKinds => {
                AdminResponse::Kinds(self.store.list_disallowed_kinds().await)
            }
            AdminCommand::BlockIp { addr, reason } => {
                self.store.block_address(addr, reason).await?;
                AdminResponse::done()
            }
            AdminCommand::UnblockIp { addr, reason } => {
                self.store.unblock_address(addr, reason).await?;
                AdminResponse::done()
            }
            AdminCommand::ListBlockedIps => AdminResponse::Addresses(
                self.store
                    .list_blocked_addresses()
                    .await
                    .into_iter()
                    .map(|(ip, reason)| ListedAddress { ip, reason })
                    .collect(),
            ),
            AdminCommand::BanEvent { id, reason } => {
                self.store.ban_content(id, reason).await?;
                AdminResponse::done()
            }
            AdminCommand::ListBannedEvents => events(self.store.list_banned_content().await),
            AdminCommand::ListEventsNeedingModeration => {
                events(self.store.list_pending_moderation().await)
            }
            AdminCommand::GrantAdmin { id, methods } => {
                self.store.grant_admin(caller, id, methods).await?;
                AdminResponse::done()
            }
            AdminCommand::RevokeAdmin { id, methods } => {
                self.store.revoke_admin(caller, id, methods).await?;
                AdminResponse::done()
            }
            AdminCommand::ListAdmins => AdminResponse::Admins(
                self.store
                    .list_admins()
                    .await
                    .into_iter()
                    .map(|(pubkey, methods)| ListedAdmin { pubkey, methods })
                    .collect(),
            ),
            AdminCommand::Stats => AdminResponse::Stats(RelayStats {
                num_connections: self.stats.num_connections(),
                uptime: self.stats.uptime().as_secs_f64(),
            }),
            AdminCommand::SetNip05 { id, name } => {
                self.names.set_mapping(&name, id.clone())?;
                self.notifier.notify(Notice::NameSet { name, id });
                AdminResponse::Message(NAME_CHANGE_OK.to_string())
            }
            AdminCommand::UnsetNip05 { name } => {
                self.names.remove_mapping(&name)?;
                self.notifier.notify(Notice::NameUnset { name });
                AdminResponse::Message(NAME_CHANGE_OK.to_string())
            }
        };
        Ok(response)
    }
}

fn identities(entries: Vec<(IdentityKey, String)>) -> AdminResponse {
    AdminResponse::Identities(
        entries
            .into_iter()
            .map(|(pubkey, reason)| ListedIdentity { pubkey, reason })
            .collect(),
    )
}

fn events(entries: Vec<(shared_types::ContentId, String)>) -> AdminResponse {
    AdminResponse::Events(
        entries
            .into_iter()
            .map(|(id, reason)| ListedEvent { id, reason })
            .collect(),
    )
}
