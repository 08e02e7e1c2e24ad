use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are opaque strings owned by the identity system. The gate only
/// distinguishes [`Role::CUSTOMER`] from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Storefront customer; the only role subject to approval gating.
    pub const CUSTOMER: Role = Role(Cow::Borrowed("customer"));

    /// Site administrator; approves accounts.
    pub const ADMINISTRATOR: Role = Role(Cow::Borrowed("administrator"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Parse a raw role value coming from user metadata.
    ///
    /// Blank values yield `None`; names are trimmed and lowercased.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self(Cow::Owned(name.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_customer(&self) -> bool {
        self.as_str() == Self::CUSTOMER.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
