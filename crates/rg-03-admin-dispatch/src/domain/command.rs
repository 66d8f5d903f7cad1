//! # Admin Commands
//!
//! Typed management commands and their decoding from the generic
//! `{ "method": ..., "params": [...] }` request shape.
//!
//! ## Params
//!
//! | Method | Params |
//! |--------|--------|
//! | `allowpubkey`, `banpubkey` | `[pubkey, reason?]` |
//! | `allowkind`, `disallowkind` | `[kind]` |
//! | `blockip`, `unblockip` | `[ip, reason?]` |
//! | `banevent` | `[event_id, reason?]` |
//! | `grantadmin`, `revokeadmin` | `[pubkey, [method, ...]]` |
//! | `setnip05` | `[pubkey, name]` |
//! | `unsetnip05` | `[name]` |
//! | `list*`, `stats` | `[]` |

use std::net::IpAddr;

use rg_01_access_control::{AdminMethod, MethodSet};
use serde::Deserialize;
use serde_json::Value;
use shared_types::{ContentId, IdentityKey, Kind};

use crate::error::DispatchError;

/// Generic management request as received from the transport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminRequest {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl AdminRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    AllowPubkey { id: IdentityKey, reason: String },
    BanPubkey { id: IdentityKey, reason: String },
    ListAllowedPubkeys,
    ListBannedPubkeys,
    AllowKind(Kind),
    DisallowKind(Kind),
    ListAllowedKinds,
    ListDisallowedKinds,
    BlockIp { addr: IpAddr, reason: String },
    UnblockIp { addr: IpAddr, reason: String },
    ListBlockedIps,
    BanEvent { id: ContentId, reason: String },
    ListBannedEvents,
    ListEventsNeedingModeration,
    GrantAdmin { id: IdentityKey, methods: MethodSet },
    RevokeAdmin { id: IdentityKey, methods: MethodSet },
    ListAdmins,
    Stats,
    SetNip05 { id: IdentityKey, name: String },
    UnsetNip05 { name: String },
}

impl AdminCommand {
    /// The permission a caller needs to run this command.
    pub fn method(&self) -> AdminMethod {
        match self {
            AdminCommand::AllowPubkey { .. } => AdminMethod::AllowPubkey,
            AdminCommand::BanPubkey { .. } => AdminMethod::BanPubkey,
            AdminCommand::ListAllowedPubkeys => AdminMethod::ListAllowedPubkeys,
            AdminCommand::ListBannedPubkeys => AdminMethod::ListBannedPubkeys,
            AdminCommand::AllowKind(_) => AdminMethod::AllowKind,
            AdminCommand::DisallowKind(_) => AdminMethod::DisallowKind,
            AdminCommand::ListAllowedKinds => AdminMethod::ListAllowedKinds,
            AdminCommand::ListDisallowedKinds => AdminMethod::ListDisallowedKinds,
            AdminCommand::BlockIp { .. } => AdminMethod::BlockIp,
            AdminCommand::UnblockIp { .. } => AdminMethod::UnblockIp,
            AdminCommand::ListBlockedIps => AdminMethod::ListBlockedIps,
            AdminCommand::BanEvent { .. } => AdminMethod::BanEvent,
            AdminCommand::ListBannedEvents => AdminMethod::ListBannedEvents,
            AdminCommand::ListEventsNeedingModeration => AdminMethod::ListEventsNeedingModeration,
            AdminCommand::GrantAdmin { .. } => AdminMethod::GrantAdmin,
            AdminCommand::RevokeAdmin { .. } => AdminMethod::RevokeAdmin,
            AdminCommand::ListAdmins => AdminMethod::ListAdmins,
            AdminCommand::Stats => AdminMethod::Stats,
            AdminCommand::SetNip05 { .. } => AdminMethod::SetNip05,
            AdminCommand::UnsetNip05 { .. } => AdminMethod::UnsetNip05,
        }
    }

    /// Decode a generic request, checking arity and param types.
    pub fn from_request(method: &str, params: &[Value]) -> Result<Self, DispatchError> {
        let method = resolve_method(method)?;
        let p = Params::new(method, params);

        let command = match method {
            AdminMethod::AllowPubkey => {
                p.arity(1, 2)?;
                AdminCommand::AllowPubkey {
                    id: p.identity(0)?,
                    reason: p.optional_text(1)?,
                }
            }
            AdminMethod::BanPubkey => {
                p.arity(1, 2)?;
                AdminCommand::BanPubkey {
                    id: p.identity(0)?,
                    reason: p.optional_text(1)?,
                }
            }
            AdminMethod::AllowKind => {
                p.arity(1, 1)?;
                AdminCommand::AllowKind(p.kind(0)?)
            }
            AdminMethod::DisallowKind => {
                p.arity(1, 1)?;
                AdminCommand::DisallowKind(p.kind(0)?)
            }
            AdminMethod::BlockIp => {
                p.arity(1, 2)?;
                AdminCommand::BlockIp {
                    addr: p.address(0)?,
                    reason: p.optional_text(1)?,
                }
            }
            AdminMethod::UnblockIp => {
                p.arity(1, 2)?;
                AdminCommand::UnblockIp {
                    addr: p.address(0)?,
                    reason: p.optional_text(1)?,
                }
            }
            AdminMethod::BanEvent => {
                p.arity(1, 2)?;
                AdminCommand::BanEvent {
                    id: p.content_id(0)?,
                    reason: p.optional_text(1)?,
                }
            }
            AdminMethod::GrantAdmin => {
                p.arity(2, 2)?;
                AdminCommand::GrantAdmin {
                    id: p.identity(0)?,
                    methods: p.methods(1)?,
                }
            }
            AdminMethod::RevokeAdmin => {
                p.arity(2, 2)?;
                AdminCommand::RevokeAdmin {
                    id: p.identity(0)?,
                    methods: p.methods(1)?,
                }
            }
            AdminMethod::SetNip05 => {
                p.arity(2, 2)?;
                AdminCommand::SetNip05 {
                    id: p.identity(0)?,
                    name: p.text(1)?,
                }
            }
            AdminMethod::UnsetNip05 => {
                p.arity(1, 1)?;
                AdminCommand::UnsetNip05 { name: p.text(0)? }
            }
            listing => {
                p.arity(0, 0)?;
                match listing {
                    AdminMethod::ListAllowedPubkeys => AdminCommand::ListAllowedPubkeys,
                    AdminMethod::ListBannedPubkeys => AdminCommand::ListBannedPubkeys,
                    AdminMethod::ListAllowedKinds => AdminCommand::ListAllowedKinds,
                    AdminMethod::ListDisallowedKinds => AdminCommand::ListDisallowedKinds,
                    AdminMethod::ListBlockedIps => AdminCommand::ListBlockedIps,
                    AdminMethod::ListBannedEvents => AdminCommand::ListBannedEvents,
                    AdminMethod::ListEventsNeedingModeration => {
                        AdminCommand::ListEventsNeedingModeration
                    }
                    AdminMethod::ListAdmins => AdminCommand::ListAdmins,
                    AdminMethod::Stats => AdminCommand::Stats,
                    other => return Err(DispatchError::UnknownMethod(other.to_string())),
                }
            }
        };
        Ok(command)
    }
}

/// Method name lookup. `*` is a grant, not a callable method; the short
/// `setnip5`/`unsetnip5` spellings are accepted for older clients.
fn resolve_method(name: &str) -> Result<AdminMethod, DispatchError> {
    let method = match name {
        "setnip5" => AdminMethod::SetNip05,
        "unsetnip5" => AdminMethod::UnsetNip05,
        other => other
            .parse::<AdminMethod>()
            .map_err(|_| DispatchError::UnknownMethod(name.to_string()))?,
    };
    if method == AdminMethod::Wildcard {
        return Err(DispatchError::UnknownMethod(name.to_string()));
    }
    Ok(method)
}

struct Params<'a> {
    method: AdminMethod,
    values: &'a [Value],
}

impl<'a> Params<'a> {
    fn new(method: AdminMethod, values: &'a [Value]) -> Self {
        Self { method, values }
    }

    fn invalid(&self, reason: impl Into<String>) -> DispatchError {
        DispatchError::invalid_params(self.method.as_str(), reason)
    }

    fn arity(&self, min: usize, max: usize) -> Result<(), DispatchError> {
        let n = self.values.len();
        if n < min || n > max {
            let expected = if min == max {
                format!("{}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(self.invalid(format!("expected {} params, got {}", expected, n)));
        }
        Ok(())
    }

    fn text(&self, i: usize) -> Result<String, DispatchError> {
        self.values
            .get(i)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.invalid(format!("param {} must be a string", i)))
    }

    fn optional_text(&self, i: usize) -> Result<String, DispatchError> {
        match self.values.get(i) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(_) => self.text(i),
        }
    }

    fn identity(&self, i: usize) -> Result<IdentityKey, DispatchError> {
        let raw = self.text(i)?;
        IdentityKey::parse(&raw).ok_or_else(|| self.invalid(format!("invalid pubkey {}", raw)))
    }

    fn content_id(&self, i: usize) -> Result<ContentId, DispatchError> {
        let id = ContentId::from(self.text(i)?.to_ascii_lowercase());
        if !id.is_well_formed() {
            return Err(self.invalid(format!("invalid event id {}", id)));
        }
        Ok(id)
    }

    fn kind(&self, i: usize) -> Result<Kind, DispatchError> {
        self.values
            .get(i)
            .and_then(Value::as_u64)
            .and_then(|n| u16::try_from(n).ok())
            .map(Kind)
            .ok_or_else(|| self.invalid(format!("param {} must be a kind number", i)))
    }

    fn address(&self, i: usize) -> Result<IpAddr, DispatchError> {
        let raw = self.text(i)?;
        raw.parse()
            .map_err(|_| self.invalid(format!("invalid ip {}", raw)))
    }

    fn methods(&self, i: usize) -> Result<MethodSet, DispatchError> {
        let list = self
            .values
            .get(i)
            .and_then(Value::as_array)
            .ok_or_else(|| self.invalid(format!("param {} must be a list of methods", i)))?;

        list.iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| self.invalid("method names must be strings"))?
                    .parse::<AdminMethod>()
                    .map_err(|e| self.invalid(e.to_string()))
            })
            .collect()
    }
}
