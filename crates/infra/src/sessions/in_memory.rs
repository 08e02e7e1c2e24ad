use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use approvalgate_approval::SessionProvider;
use approvalgate_core::{GateError, GateResult, SessionId, UserId};

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// In-memory session store with a fixed time-to-live.
///
/// Logout removes the entry under the write lock before returning, so a
/// concurrent request cannot resolve a terminated session.
#[derive(Debug)]
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Live sessions, expired ones not yet evicted included.
    pub fn len(&self) -> GateResult<usize> {
        Ok(self.sessions.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> GateResult<bool> {
        Ok(self.len()? == 0)
    }

    // Opening sweeps expired entries, so the map is bounded by the sessions
    // issued within one TTL.
    fn open_at(&self, user_id: UserId, now: DateTime<Utc>) -> GateResult<SessionId> {
        let id = SessionId::new();
        let mut map = self.sessions.write().map_err(|_| poisoned())?;
        map.retain(|_, entry| entry.expires_at > now);
        map.insert(
            id,
            SessionEntry {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        Ok(id)
    }

    // An expired entry is evicted by the lookup that finds it.
    fn resolve_at(&self, session_id: &SessionId, now: DateTime<Utc>) -> GateResult<Option<UserId>> {
        {
            let map = self.sessions.read().map_err(|_| poisoned())?;
            match map.get(session_id) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.user_id)),
                Some(_) => {}
            }
        }
        let mut map = self.sessions.write().map_err(|_| poisoned())?;
        if map.get(session_id).is_some_and(|entry| entry.expires_at <= now) {
            map.remove(session_id);
        }
        Ok(None)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(48))
    }
}

fn poisoned() -> GateError {
    GateError::storage("session store lock poisoned")
}

impl SessionProvider for InMemorySessionStore {
    fn open(&self, user_id: UserId) -> GateResult<SessionId> {
        self.open_at(user_id, Utc::now())
    }

    fn resolve(&self, session_id: &SessionId) -> GateResult<Option<UserId>> {
        self.resolve_at(session_id, Utc::now())
    }

    fn logout(&self, session_id: &SessionId) -> GateResult<()> {
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_resolve_logout() {
        let store = InMemorySessionStore::default();
        let user = UserId::new();

        let session = store.open(user).unwrap();
        assert_eq!(store.resolve(&session).unwrap(), Some(user));

        store.logout(&session).unwrap();
        assert_eq!(store.resolve(&session).unwrap(), None);

        // Logging out twice is harmless.
        store.logout(&session).unwrap();
    }

    #[test]
    fn expired_sessions_do_not_resolve() {
        let store = InMemorySessionStore::new(Duration::minutes(5));
        let session = store.open(UserId::new()).unwrap();

        let later = Utc::now() + Duration::minutes(10);
        assert_eq!(store.resolve_at(&session, later).unwrap(), None);
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn resolving_an_expired_session_evicts_it() {
        let store = InMemorySessionStore::new(Duration::minutes(5));
        let now = Utc::now();
        let sessions: Vec<_> = (0..1000)
            .map(|_| store.open_at(UserId::new(), now).unwrap())
            .collect();
        assert_eq!(store.len().unwrap(), 1000);

        let later = now + Duration::minutes(10);
        for session in &sessions {
            assert_eq!(store.resolve_at(session, later).unwrap(), None);
        }
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn opening_sweeps_expired_sessions() {
        let store = InMemorySessionStore::new(Duration::minutes(5));
        let now = Utc::now();
        for _ in 0..3 {
            store.open_at(UserId::new(), now).unwrap();
        }

        let fresh = store
            .open_at(UserId::new(), now + Duration::minutes(10))
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.resolve_at(&fresh, now + Duration::minutes(11)).unwrap().is_some());
    }

    #[test]
    fn live_sessions_survive_lookups() {
        let store = InMemorySessionStore::new(Duration::minutes(5));
        let now = Utc::now();
        let user = UserId::new();
        let session = store.open_at(user, now).unwrap();

        assert_eq!(store.resolve_at(&session, now + Duration::minutes(1)).unwrap(), Some(user));
        assert_eq!(store.len().unwrap(), 1);
    }
}
