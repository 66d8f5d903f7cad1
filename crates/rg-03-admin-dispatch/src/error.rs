//! Error types for Admin Dispatch

use rg_01_access_control::{AccessControlError, AdminMethod, ErrorClass};
use rg_04_name_resolution::NameError;
use shared_types::IdentityKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("pubkey {0} is not an admin")]
    NotAnAdmin(IdentityKey),

    #[error("pubkey {caller} is not permitted to call {method}")]
    MethodNotPermitted {
        caller: IdentityKey,
        method: AdminMethod,
    },

    #[error("unknown method {0}")]
    UnknownMethod(String),

    #[error("invalid params for '{method}': {reason}")]
    InvalidParams { method: String, reason: String },

    #[error(transparent)]
    Store(#[from] AccessControlError),

    #[error(transparent)]
    Name(#[from] NameError),
}

impl DispatchError {
    pub(crate) fn invalid_params(method: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::InvalidParams {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotAnAdmin(_) | Self::MethodNotPermitted { .. } => ErrorClass::Unauthorized,
            Self::UnknownMethod(_) | Self::InvalidParams { .. } => ErrorClass::Validation,
            Self::Store(e) => e.class(),
            Self::Name(e) if e.is_not_found() => ErrorClass::NotFound,
            Self::Name(_) => ErrorClass::DependentOperationFailure,
        }
    }

    /// Whether the process must stop: the access-control state could not be saved.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_fatal())
    }
}
