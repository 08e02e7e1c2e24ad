//! Access Gate: per-request allow / redirect / forced-logout decision.

use std::sync::Arc;

use serde::Serialize;

use approvalgate_auth::Role;
use approvalgate_core::{GateError, GateResult, SessionId, UserId};

use crate::{ApprovalStore, SessionProvider, UserDirectory};

pub const LOGIN_PATH: &str = "/login/";

/// Value of the `login_error` query parameter after a forced logout.
pub const NOT_APPROVED: &str = "not_approved";

/// The login page is `/login` and everything below `/login/`.
pub fn is_login_page(path: &str) -> bool {
    path == "/login" || path.starts_with(LOGIN_PATH)
}

/// An incoming page request, as far as the gate is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    pub path: String,
    pub session: Option<SessionId>,
}

impl GateRequest {
    pub fn new(path: impl Into<String>, session: Option<SessionId>) -> Self {
        Self {
            path: path.into(),
            session,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Serve the request unchanged.
    Allow { user_id: Option<UserId> },
    /// Not authenticated: go to the login page.
    RedirectToLogin,
    /// Unapproved customer: the session was already terminated.
    ForcedLogout,
}

impl GateDecision {
    /// Location header for redirect decisions.
    pub fn redirect_location(&self) -> Option<String> {
        match self {
            GateDecision::Allow { .. } => None,
            GateDecision::RedirectToLogin => Some(LOGIN_PATH.to_string()),
            GateDecision::ForcedLogout => Some(format!("{LOGIN_PATH}?login_error={NOT_APPROVED}")),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow { .. })
    }
}

#[derive(Clone)]
pub struct AccessGate {
    sessions: Arc<dyn SessionProvider>,
    directory: Arc<dyn UserDirectory>,
    approvals: ApprovalStore,
}

impl AccessGate {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        directory: Arc<dyn UserDirectory>,
        approvals: ApprovalStore,
    ) -> Self {
        Self {
            sessions,
            directory,
            approvals,
        }
    }

    /// Evaluate the gate rules in order; first match wins.
    ///
    /// 1. unauthenticated, not on the login page → [`GateDecision::RedirectToLogin`]
    /// 2. customer with `approved == false` → session terminated, [`GateDecision::ForcedLogout`]
    /// 3. otherwise → [`GateDecision::Allow`]
    pub fn evaluate(&self, request: &GateRequest) -> GateResult<GateDecision> {
        let Some((session_id, user_id, role)) = self.authenticate(request)? else {
            return Ok(Self::unauthenticated(&request.path));
        };

        if requires_approval(role.as_deref()) && !self.is_approved(user_id)? {
            // Logout completes before the redirect is handed back.
            self.sessions.logout(&session_id)?;
            tracing::info!(user_id = %user_id, "unapproved customer logged out");
            return Ok(GateDecision::ForcedLogout);
        }

        tracing::debug!(user_id = %user_id, path = %request.path, "request allowed");
        Ok(GateDecision::Allow {
            user_id: Some(user_id),
        })
    }

    fn unauthenticated(path: &str) -> GateDecision {
        if is_login_page(path) {
            GateDecision::Allow { user_id: None }
        } else {
            GateDecision::RedirectToLogin
        }
    }

    // A session whose user vanished from the directory is dropped and treated
    // as anonymous.
    fn authenticate(
        &self,
        request: &GateRequest,
    ) -> GateResult<Option<(SessionId, UserId, Option<String>)>> {
        let Some(session_id) = request.session else {
            return Ok(None);
        };
        let Some(user_id) = self.sessions.resolve(&session_id)? else {
            return Ok(None);
        };
        match self.directory.get_role(user_id) {
            Ok(role) => Ok(Some((session_id, user_id, role))),
            Err(GateError::NotFound) => {
                self.sessions.logout(&session_id)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // A customer without an approval record has never been approved.
    fn is_approved(&self, user_id: UserId) -> GateResult<bool> {
        match self.approvals.get(user_id) {
            Ok(record) => Ok(record.approved),
            Err(GateError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Only well-formed `customer` roles are gated; anything else fails open.
pub fn requires_approval(raw_role: Option<&str>) -> bool {
    raw_role
        .and_then(Role::parse)
        .is_some_and(|role| role.is_customer())
}
