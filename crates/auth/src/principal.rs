use serde::{Deserialize, Serialize};

use approvalgate_core::UserId;

use crate::{Permission, Role};

/// A fully resolved actor for authorization decisions.
///
/// Construction is decoupled from storage and transport: the API derives it
/// from the current session and the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Option<Role>,
    pub permissions: Vec<Permission>,
}

impl Actor {
    /// Build an actor whose permissions come from the default role mapping.
    pub fn from_role(user_id: UserId, role: Option<Role>) -> Self {
        let permissions = role
            .as_ref()
            .map(crate::role_permissions)
            .unwrap_or_default();
        Self {
            user_id,
            role,
            permissions,
        }
    }

    pub fn has(&self, required: &Permission) -> bool {
        self.permissions
            .iter()
            .any(|p| p.is_wildcard() || p == required)
    }
}
