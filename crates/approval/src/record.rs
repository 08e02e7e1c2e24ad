use serde::{Deserialize, Serialize};

use approvalgate_core::UserId;

/// Persisted approval state of one user.
///
/// `previously_approved` is true only while an approval email has already
/// been sent for the current approval.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub approved: bool,
    pub previously_approved: bool,
}

impl ApprovalRecord {
    /// State of a freshly registered account.
    pub fn pending() -> Self {
        Self::default()
    }
}

/// Result of an approval write, as observed by the notifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalChange {
    pub user_id: UserId,
    /// Value just written.
    pub approved: bool,
    /// Value of the shadow flag at the moment of the write.
    pub previously_approved: bool,
}
