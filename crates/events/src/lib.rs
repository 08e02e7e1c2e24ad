//! Account lifecycle events consumed by the notifier.

pub mod account;
pub mod event;

pub use account::{AccountEvent, ApprovalUpdated, CustomerRegistered};
pub use event::Event;
