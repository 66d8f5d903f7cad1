//! The permission gate every command passes before it runs.

use std::collections::BTreeMap;

use rg_01_access_control::{permits, AdminMethod, MethodSet};
use shared_types::IdentityKey;

use crate::error::DispatchError;

/// Check that `caller` holds `method` (or the wildcard) in `admins`.
pub fn authorize(
    admins: &BTreeMap<IdentityKey, MethodSet>,
    caller: &IdentityKey,
    method: AdminMethod,
) -> Result<(), DispatchError> {
    let granted = admins
        .get(caller)
        .ok_or_else(|| DispatchError::NotAnAdmin(caller.clone()))?;

    if permits(granted, method) {
        Ok(())
    } else {
        Err(DispatchError::MethodNotPermitted {
            caller: caller.clone(),
            method,
        })
    }
}
