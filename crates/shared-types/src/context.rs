//! Per-request context supplied by the transport.

use crate::entities::IdentityKey;
use std::net::IpAddr;

/// Who is asking and from where.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    /// Identity proven by the transport's authentication handshake, if any.
    pub authenticated: Option<IdentityKey>,
    /// Source address of the connection, if known.
    pub remote_addr: Option<IpAddr>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(mut self, identity: impl Into<IdentityKey>) -> Self {
        self.authenticated = Some(identity.into());
        self
    }

    pub fn from_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }
}
