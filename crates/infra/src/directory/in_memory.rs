use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use approvalgate_approval::{DirectoryUser, NewUser, UserDirectory, UserProfile};
use approvalgate_core::{GateError, GateResult, UserId};

#[derive(Debug, Default)]
struct Inner {
    // Insertion order doubles as registration order.
    users: Vec<DirectoryUser>,
    by_id: HashMap<UserId, usize>,
    by_username: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
}

/// In-memory user directory for tests/dev.
///
/// Usernames and emails are unique (emails case-insensitively).
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored role of a user with an arbitrary raw value.
    ///
    /// Used to simulate data imported from the host with blank or unknown roles.
    pub fn set_raw_role(&self, user_id: UserId, role: impl Into<String>) -> GateResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let idx = *inner.by_id.get(&user_id).ok_or(GateError::NotFound)?;
        inner.users[idx].role = role.into();
        Ok(())
    }

    fn with_user<T>(&self, user_id: UserId, f: impl FnOnce(&DirectoryUser) -> T) -> GateResult<T> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let idx = *inner.by_id.get(&user_id).ok_or(GateError::NotFound)?;
        Ok(f(&inner.users[idx]))
    }
}

fn poisoned() -> GateError {
    GateError::storage("user directory lock poisoned")
}

impl UserDirectory for InMemoryUserDirectory {
    fn create(&self, new_user: NewUser) -> GateResult<DirectoryUser> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let email_key = new_user.email.to_ascii_lowercase();
        if inner.by_username.contains_key(&new_user.username) {
            return Err(GateError::conflict(format!(
                "username '{}' is already registered",
                new_user.username
            )));
        }
        if inner.by_email.contains_key(&email_key) {
            return Err(GateError::conflict(format!(
                "email '{}' is already registered",
                new_user.email
            )));
        }

        let user = DirectoryUser {
            id: UserId::new(),
            username: new_user.username,
            email: new_user.email,
            display_name: new_user.display_name,
            role: new_user.role.as_str().to_string(),
            created_at: Utc::now(),
        };

        let idx = inner.users.len();
        inner.by_id.insert(user.id, idx);
        inner.by_username.insert(user.username.clone(), idx);
        inner.by_email.insert(email_key, idx);
        inner.users.push(user.clone());

        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> GateResult<Option<DirectoryUser>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .by_username
            .get(username)
            .map(|idx| inner.users[*idx].clone()))
    }

    fn get_role(&self, user_id: UserId) -> GateResult<Option<String>> {
        self.with_user(user_id, |u| {
            let role = u.role.trim();
            (!role.is_empty()).then(|| role.to_string())
        })
    }

    fn get_profile(&self, user_id: UserId) -> GateResult<UserProfile> {
        self.with_user(user_id, DirectoryUser::profile)
    }

    fn list(&self) -> GateResult<Vec<DirectoryUser>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.users.clone())
    }
}
