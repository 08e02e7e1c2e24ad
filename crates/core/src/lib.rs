//! `approvalgate-core`: shared building blocks for the approval gate.
//!
//! This crate contains **pure** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{GateError, GateResult};
pub use id::{SessionId, UserId};
