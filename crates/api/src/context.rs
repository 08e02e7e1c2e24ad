use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use approvalgate_core::{SessionId, UserId};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gate_session";

/// Identity of the request as admitted by the gate.
///
/// Inserted by the gate middleware; `user_id` is `None` for anonymous
/// visitors of the login page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CurrentUser {
    user_id: Option<UserId>,
}

impl CurrentUser {
    pub fn new(user_id: Option<UserId>) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Session id carried by the request; malformed cookies count as absent.
pub fn session_from(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

pub fn with_session(jar: CookieJar, session: SessionId) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, session.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
