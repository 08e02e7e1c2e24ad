//! Facts emitted by the account pipeline.
//!
//! These are handed to the notifier by explicit calls, never through an
//! ambient subscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use approvalgate_core::UserId;

use crate::Event;

/// A new customer account was created (no session was started).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegistered {
    pub user_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// The approval flag of a user was written (any actor, any value).
///
/// `previously_approved` is the shadow flag as it stood when the write
/// landed; the notifier decides the edge from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalUpdated {
    pub user_id: UserId,
    pub approved: bool,
    pub previously_approved: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    CustomerRegistered(CustomerRegistered),
    ApprovalUpdated(ApprovalUpdated),
}

impl Event for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::CustomerRegistered(_) => "account.customer_registered",
            AccountEvent::ApprovalUpdated(_) => "account.approval_updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn subject(&self) -> UserId {
        match self {
            AccountEvent::CustomerRegistered(e) => e.user_id,
            AccountEvent::ApprovalUpdated(e) => e.user_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::CustomerRegistered(e) => e.occurred_at,
            AccountEvent::ApprovalUpdated(e) => e.occurred_at,
        }
    }
}
