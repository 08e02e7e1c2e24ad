//! Typed inputs to the account pipeline.

use serde::{Deserialize, Serialize};

use approvalgate_auth::Role;
use approvalgate_core::{GateError, GateResult, UserId};

use crate::NewUser;

/// Storefront self-registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NewCustomer {
    /// Validate and normalise into a directory record with role `customer`.
    pub fn into_new_user(self) -> GateResult<NewUser> {
        into_new_user(self.username, self.email, self.display_name, Role::CUSTOMER)
    }
}

pub(crate) fn into_new_user(
    username: String,
    email: String,
    display_name: Option<String>,
    role: Role,
) -> GateResult<NewUser> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(GateError::validation("username must not be empty"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(GateError::validation("username must not contain whitespace"));
    }

    let email = email.trim().to_ascii_lowercase();
    if !is_plausible_email(&email) {
        return Err(GateError::validation(format!("invalid email '{email}'")));
    }

    let display_name = display_name
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| username.clone());

    Ok(NewUser {
        username,
        email,
        display_name,
        role,
    })
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// An administrator's write to a user's approval flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateApproval {
    pub user_id: UserId,
    pub approved: bool,
}

impl UpdateApproval {
    /// Interpret the profile form's `user_approval` checkbox: only `"1"`
    /// approves; an absent or any other value revokes.
    pub fn from_checkbox(user_id: UserId, value: Option<&str>) -> Self {
        Self {
            user_id,
            approved: value.map(str::trim) == Some("1"),
        }
    }
}
