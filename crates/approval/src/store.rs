//! Approval Store: typed access to the per-user approval record.

use std::sync::Arc;

use approvalgate_auth::{authorize, Actor, Permission};
use approvalgate_core::{GateError, GateResult, UserId};

use crate::{ApprovalChange, ApprovalRecord, ApprovalRepository};

/// Approval Store contract over a pluggable [`ApprovalRepository`].
///
/// No side effects beyond persistence; notifications are the caller's job.
#[derive(Clone)]
pub struct ApprovalStore {
    repo: Arc<dyn ApprovalRepository>,
}

impl ApprovalStore {
    pub fn new(repo: Arc<dyn ApprovalRepository>) -> Self {
        Self { repo }
    }

    /// Fails with `NotFound` if the user has no record.
    pub fn get(&self, user_id: UserId) -> GateResult<ApprovalRecord> {
        self.repo.load(user_id)?.ok_or(GateError::NotFound)
    }

    /// Create the pending record for a new account. Existing records win.
    pub fn initialize(&self, user_id: UserId) -> GateResult<ApprovalRecord> {
        if let Some(existing) = self.repo.load(user_id)? {
            return Ok(existing);
        }
        let record = ApprovalRecord::pending();
        self.repo.save(user_id, record)?;
        Ok(record)
    }

    /// Write the approval flag on behalf of `actor`.
    ///
    /// Requires [`Permission::EDIT_USER`]; a denied write leaves the record
    /// untouched. Writing the current value again is allowed and reported
    /// like any other write.
    pub fn set_approved(
        &self,
        actor: &Actor,
        user_id: UserId,
        value: bool,
    ) -> GateResult<ApprovalChange> {
        authorize(actor, &Permission::EDIT_USER)?;

        let mut record = self.get(user_id)?;
        record.approved = value;
        self.repo.save(user_id, record)?;

        Ok(ApprovalChange {
            user_id,
            approved: record.approved,
            previously_approved: record.previously_approved,
        })
    }

    /// Shadow flag write; only the notifier calls this.
    pub(crate) fn set_previously_approved(&self, user_id: UserId, value: bool) -> GateResult<()> {
        let mut record = self.get(user_id)?;
        record.previously_approved = value;
        self.repo.save(user_id, record)
    }

    pub fn list(&self) -> GateResult<Vec<(UserId, ApprovalRecord)>> {
        self.repo.all()
    }
}
