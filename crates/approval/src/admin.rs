//! Data backing the admin surface: user listing and profile view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use approvalgate_core::UserId;

use crate::{ApprovalRecord, DirectoryUser, Translator};

/// One row of the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// State of the profile page's approval checkbox.
    pub approved: bool,
    /// Content of the "Approved" column.
    pub approved_label: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn new(user: DirectoryUser, record: Option<ApprovalRecord>, t: &dyn Translator) -> Self {
        let approved = record.is_some_and(|r| r.approved);
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            approved,
            approved_label: approved_label(approved, t),
            created_at: user.created_at,
        }
    }
}

pub fn approved_label(approved: bool, t: &dyn Translator) -> String {
    t.translate(if approved { "Yes" } else { "No" }).into_owned()
}
