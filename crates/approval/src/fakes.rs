//! Minimal in-crate collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use approvalgate_core::{GateError, GateResult, SessionId, UserId};

use crate::{
    ApprovalRecord, ApprovalRepository, DirectoryUser, MailError, MailMessage, MailTransport,
    NewUser, SessionProvider, UserDirectory, UserProfile,
};

#[derive(Default)]
pub struct FakeApprovals(Mutex<HashMap<UserId, ApprovalRecord>>);

impl ApprovalRepository for FakeApprovals {
    fn load(&self, user_id: UserId) -> GateResult<Option<ApprovalRecord>> {
        Ok(self.0.lock().unwrap().get(&user_id).copied())
    }

    fn save(&self, user_id: UserId, record: ApprovalRecord) -> GateResult<()> {
        self.0.lock().unwrap().insert(user_id, record);
        Ok(())
    }

    fn all(&self) -> GateResult<Vec<(UserId, ApprovalRecord)>> {
        Ok(self.0.lock().unwrap().iter().map(|(k, v)| (*k, *v)).collect())
    }
}

#[derive(Default)]
pub struct FakeDirectory(Mutex<Vec<DirectoryUser>>);

impl FakeDirectory {
    /// Insert a user with an arbitrary raw role value.
    pub fn insert_raw(&self, username: &str, role: &str) -> UserId {
        let user = DirectoryUser {
            id: UserId::new(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            display_name: username.to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.0.lock().unwrap().push(user);
        id
    }

    /// Drop a user, as if deleted behind the service's back.
    pub fn forget(&self, user_id: UserId) {
        self.0.lock().unwrap().retain(|u| u.id != user_id);
    }
}

impl UserDirectory for FakeDirectory {
    fn create(&self, new_user: NewUser) -> GateResult<DirectoryUser> {
        let mut users = self.0.lock().unwrap();
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(GateError::conflict("username already registered"));
        }
        let user = DirectoryUser {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            display_name: new_user.display_name,
            role: new_user.role.as_str().to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> GateResult<Option<DirectoryUser>> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.username == username).cloned())
    }

    fn get_role(&self, user_id: UserId) -> GateResult<Option<String>> {
        let users = self.0.lock().unwrap();
        let user = users.iter().find(|u| u.id == user_id).ok_or(GateError::NotFound)?;
        Ok(Some(user.role.clone()).filter(|r| !r.is_empty()))
    }

    fn get_profile(&self, user_id: UserId) -> GateResult<UserProfile> {
        let users = self.0.lock().unwrap();
        users
            .iter()
            .find(|u| u.id == user_id)
            .map(DirectoryUser::profile)
            .ok_or(GateError::NotFound)
    }

    fn list(&self) -> GateResult<Vec<DirectoryUser>> {
        Ok(self.0.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeSessions(Mutex<HashMap<SessionId, UserId>>);

impl SessionProvider for FakeSessions {
    fn open(&self, user_id: UserId) -> GateResult<SessionId> {
        let id = SessionId::new();
        self.0.lock().unwrap().insert(id, user_id);
        Ok(id)
    }

    fn resolve(&self, session_id: &SessionId) -> GateResult<Option<UserId>> {
        Ok(self.0.lock().unwrap().get(session_id).copied())
    }

    fn logout(&self, session_id: &SessionId) -> GateResult<()> {
        self.0.lock().unwrap().remove(session_id);
        Ok(())
    }
}

/// Records every message; optionally fails every send.
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    pub fail: bool,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn subjects_to(&self, to: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == to)
            .map(|m| m.subject.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl MailTransport for FakeMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            Err(MailError::Transport("smtp unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}
