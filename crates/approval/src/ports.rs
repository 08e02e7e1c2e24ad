//! Collaborator contracts the core calls into.
//!
//! Every trait is object-safe and `Send + Sync` so the API can hold them as
//! `Arc<dyn ...>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use approvalgate_auth::Role;
use approvalgate_core::{GateResult, SessionId, UserId};

use crate::ApprovalRecord;

/// Storage for approval records, keyed by user id.
pub trait ApprovalRepository: Send + Sync {
    fn load(&self, user_id: UserId) -> GateResult<Option<ApprovalRecord>>;
    fn save(&self, user_id: UserId, record: ApprovalRecord) -> GateResult<()>;
    fn all(&self) -> GateResult<Vec<(UserId, ApprovalRecord)>>;
}

/// Contact details of a user, as used by mail templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub display_name: String,
    pub username: String,
}

/// Input for creating an account in the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

/// A user as stored by the identity system.
///
/// `role` is the raw stored value; it may be blank or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl DirectoryUser {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            username: self.username.clone(),
        }
    }
}

/// User record store of the identity system.
pub trait UserDirectory: Send + Sync {
    /// Create an account; usernames and emails are unique.
    fn create(&self, new_user: NewUser) -> GateResult<DirectoryUser>;

    fn find_by_username(&self, username: &str) -> GateResult<Option<DirectoryUser>>;

    /// Raw role value; `NotFound` for unknown users, `None` when no role is set.
    fn get_role(&self, user_id: UserId) -> GateResult<Option<String>>;

    fn get_profile(&self, user_id: UserId) -> GateResult<UserProfile>;

    fn list(&self) -> GateResult<Vec<DirectoryUser>>;
}

/// Identity/session provider.
pub trait SessionProvider: Send + Sync {
    fn open(&self, user_id: UserId) -> GateResult<SessionId>;

    /// `None` once the session was logged out or never existed.
    fn resolve(&self, session_id: &SessionId) -> GateResult<Option<UserId>>;

    /// Invalidate the session. Must be complete when this returns.
    fn logout(&self, session_id: &SessionId) -> GateResult<()>;
}

/// One outgoing HTML email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail rejected: {0}")]
    Rejected(String),
}

/// Transactional mail sender. Retries, if any, are the transport's business.
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
