use std::sync::Arc;

use axum::{
    extract::{Extension, FromRequest, RawQuery, Request},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use approvalgate_approval::{NewCustomer, LOGIN_PATH, NOT_APPROVED};
use approvalgate_core::GateError;

use crate::app::dto::{JsonOrForm, RegisterResponse, SignInRequest};
use crate::app::{errors, services::AppServices};
use crate::config::SignInPolicy;
use crate::context;

/// Landing page after a successful sign-in.
pub const ACCOUNT_PATH: &str = "/my-account/";

pub const NOT_APPROVED_NOTICE: &str = "Your account is not yet active.";

/// First `login_error` value of a raw query string, undecoded.
///
/// The page must render whatever else the query carries, so nothing here
/// can fail.
pub fn login_error(query: Option<&str>) -> Option<&str> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == "login_error")
        .map(|(_, value)| value)
}

/// GET /login/
pub async fn page(RawQuery(query): RawQuery) -> Html<String> {
    let notice = match login_error(query.as_deref()) {
        Some(NOT_APPROVED) => format!(r#"<p class="notice">{NOT_APPROVED_NOTICE}</p>"#),
        _ => String::new(),
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Log in</title></head>
<body>
<h1>Log in</h1>
{notice}
<form method="post" action="{LOGIN_PATH}">
<label>Username <input name="username"></label>
<button type="submit">Log in</button>
</form>
</body>
</html>
"#
    ))
}

/// POST /login/
///
/// Passwords are never checked here; see [`SignInPolicy`] for where the
/// username comes from.
pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    req: Request,
) -> Response {
    let username = match &services.sign_in {
        SignInPolicy::Disabled => {
            return errors::json_error(
                StatusCode::FORBIDDEN,
                "sign_in_disabled",
                "sign-in is not enabled on this server",
            );
        }
        SignInPolicy::TrustedHeader(header) => {
            match req.headers().get(header.as_str()).and_then(|v| v.to_str().ok()) {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => {
                    return errors::json_error(
                        StatusCode::UNAUTHORIZED,
                        "unauthenticated",
                        "no authenticated identity on the request",
                    );
                }
            }
        }
        SignInPolicy::AssertedUsername => {
            match JsonOrForm::<SignInRequest>::from_request(req, &()).await {
                Ok(JsonOrForm(body)) => body.username.trim().to_string(),
                Err(rejection) => return rejection,
            }
        }
    };

    match services.accounts.sign_in(&username) {
        Ok(session) => {
            (context::with_session(jar, session), errors::see_other(ACCOUNT_PATH)).into_response()
        }
        Err(GateError::NotFound) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_login",
            "unknown username",
        ),
        Err(e) => errors::gate_error_to_response(e),
    }
}

/// POST /login/register
///
/// Creates a pending customer. No session is opened: the account cannot be
/// used until an administrator approves it.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    JsonOrForm(req): JsonOrForm<NewCustomer>,
) -> Response {
    match services.accounts.register_customer(req) {
        Ok(user_id) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                user_id,
                approved: false,
            }),
        )
            .into_response(),
        Err(e) => errors::gate_error_to_response(e),
    }
}

/// POST /logout
pub async fn logout(Extension(services): Extension<Arc<AppServices>>, jar: CookieJar) -> Response {
    if let Some(session) = context::session_from(&jar) {
        if let Err(e) = services.accounts.sign_out(&session) {
            return errors::gate_error_to_response(e);
        }
    }
    (context::without_session(jar), errors::found(LOGIN_PATH)).into_response()
}
