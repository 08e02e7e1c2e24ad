//! Error model shared by every layer of the gate.

use thiserror::Error;

/// Result type used across the gate.
pub type GateResult<T> = Result<T, GateError>;

/// Gate-level error.
///
/// Mail transport failures are deliberately absent: they are logged and
/// swallowed at the notifier and never reach callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The referenced user (or their approval record) does not exist.
    #[error("not found")]
    NotFound,

    /// The acting principal lacks the permission required for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A value failed validation (e.g. malformed email).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (e.g. username already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed (lock poisoning, connection loss).
    #[error("storage error: {0}")]
    Storage(String),
}

impl GateError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
