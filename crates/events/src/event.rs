use chrono::{DateTime, Utc};

use approvalgate_core::UserId;

/// Envelope data shared by account events; handlers log it, they never branch on it.
pub trait Event {
    /// `account.<fact>`; stable once published.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Account the fact is about.
    fn subject(&self) -> UserId;

    fn occurred_at(&self) -> DateTime<Utc>;
}
