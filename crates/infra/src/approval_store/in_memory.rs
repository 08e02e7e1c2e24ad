use std::collections::HashMap;
use std::sync::RwLock;

use approvalgate_approval::{ApprovalRecord, ApprovalRepository};
use approvalgate_core::{GateError, GateResult, UserId};

/// In-memory approval records for tests/dev.
///
/// Last write wins; there is no versioning.
#[derive(Debug, Default)]
pub struct InMemoryApprovalRepository {
    records: RwLock<HashMap<UserId, ApprovalRecord>>,
}

impl InMemoryApprovalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> GateError {
    GateError::storage("approval store lock poisoned")
}

impl ApprovalRepository for InMemoryApprovalRepository {
    fn load(&self, user_id: UserId) -> GateResult<Option<ApprovalRecord>> {
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map.get(&user_id).copied())
    }

    fn save(&self, user_id: UserId, record: ApprovalRecord) -> GateResult<()> {
        let mut map = self.records.write().map_err(|_| poisoned())?;
        map.insert(user_id, record);
        Ok(())
    }

    fn all(&self) -> GateResult<Vec<(UserId, ApprovalRecord)>> {
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map.iter().map(|(id, record)| (*id, *record)).collect())
    }
}
