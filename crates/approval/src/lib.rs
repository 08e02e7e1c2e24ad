//! `approvalgate-approval`: the approval state machine and its policies.
//!
//! - `store`: Approval Store contract over a pluggable repository
//! - `gate`: per-request access decision
//! - `notifier`: edge-triggered account emails
//! - `service`: explicit pipeline wiring the three together
//!
//! Storage, sessions and mail delivery are reached only through the traits in
//! [`ports`]; this crate performs no IO of its own.

pub mod admin;
pub mod commands;
pub mod gate;
pub mod notifier;
pub mod ports;
pub mod record;
pub mod service;
pub mod store;
pub mod templates;

#[cfg(test)]
pub(crate) mod fakes;

pub use admin::UserRow;
pub use commands::{NewCustomer, UpdateApproval};
pub use gate::{is_login_page, AccessGate, GateDecision, GateRequest, LOGIN_PATH, NOT_APPROVED};
pub use notifier::{approval_edge, EdgeAction, Notifier, NotifierConfig, NotifyReport};
pub use ports::{
    ApprovalRepository, DirectoryUser, MailError, MailMessage, MailTransport, NewUser,
    SessionProvider, UserDirectory, UserProfile,
};
pub use record::{ApprovalChange, ApprovalRecord};
pub use service::{ApprovalGateService, ApprovalOutcome, Collaborators};
pub use store::ApprovalStore;
pub use templates::{MailKind, Passthrough, SiteInfo, Translator};
