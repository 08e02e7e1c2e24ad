use thiserror::Error;

use approvalgate_core::GateError;

use crate::{Actor, Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

impl From<AuthzError> for GateError {
    fn from(err: AuthzError) -> Self {
        GateError::PermissionDenied(err.to_string())
    }
}

/// Authorize an actor for a single permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(actor: &Actor, required: &Permission) -> Result<(), AuthzError> {
    if actor.has(required) {
        Ok(())
    } else {
        tracing::debug!(user_id = %actor.user_id, permission = %required, "authorization denied");
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Default role → permission mapping.
///
/// Administrators get the wildcard; `shop_manager` may manage users;
/// customers and unknown roles get nothing.
pub fn role_permissions(role: &Role) -> Vec<Permission> {
    match role.as_str() {
        "administrator" => vec![Permission::WILDCARD],
        "shop_manager" => vec![Permission::EDIT_USER, Permission::LIST_USERS],
        _ => Vec::new(),
    }
}
