//! Admin user management: listing, profile view, and the approval write.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use approvalgate_auth::Actor;
use approvalgate_core::UserId;

use crate::app::dto::{ApprovalBody, JsonOrForm, UserListResponse};
use crate::app::{errors, services::AppServices};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/approval", post(set_approval))
}

fn actor(services: &AppServices, current: CurrentUser) -> Result<Actor, Response> {
    let user_id = current.user_id().ok_or_else(|| {
        errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in first")
    })?;
    services
        .accounts
        .actor_for(user_id)
        .map_err(errors::gate_error_to_response)
}

fn parse_user_id(raw: &str) -> Result<UserId, Response> {
    raw.parse().map_err(errors::gate_error_to_response)
}

/// GET /admin/users
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
) -> Response {
    let actor = match actor(&services, current) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    match services.accounts.user_rows(&actor) {
        Ok(users) => Json(UserListResponse { users }).into_response(),
        Err(e) => errors::gate_error_to_response(e),
    }
}

/// GET /admin/users/:id
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Response {
    let (actor, user_id) = match actor(&services, current).and_then(|a| Ok((a, parse_user_id(&id)?))) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.accounts.user_row(&actor, user_id) {
        Ok(row) => Json(row).into_response(),
        Err(e) => errors::gate_error_to_response(e),
    }
}

/// POST /admin/users/:id/approval
pub async fn set_approval(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    JsonOrForm(body): JsonOrForm<ApprovalBody>,
) -> Response {
    let (actor, user_id) = match actor(&services, current).and_then(|a| Ok((a, parse_user_id(&id)?))) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .accounts
        .update_approval(&actor, body.into_command(user_id))
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::gate_error_to_response(e),
    }
}
