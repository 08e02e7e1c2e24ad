use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use approvalgate_approval::{GateDecision, GateRequest};

use crate::app::{errors, services::AppServices};
use crate::context::{self, CurrentUser};

/// Run the access gate in front of every page route.
pub async fn gate_middleware(
    State(services): State<Arc<AppServices>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    // Nested routers see a stripped URI; the login-page test needs the full path.
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request = GateRequest::new(path, context::session_from(&jar));

    let decision = match services.accounts.evaluate(&request) {
        Ok(decision) => decision,
        Err(e) => return errors::gate_error_to_response(e),
    };

    match decision {
        GateDecision::Allow { user_id } => {
            req.extensions_mut().insert(CurrentUser::new(user_id));
            next.run(req).await
        }
        GateDecision::RedirectToLogin => errors::found(&location(&decision)),
        // The session is already gone server-side; drop the cookie as well.
        GateDecision::ForcedLogout => (
            context::without_session(jar),
            errors::found(&location(&decision)),
        )
            .into_response(),
    }
}

fn location(decision: &GateDecision) -> String {
    decision
        .redirect_location()
        .unwrap_or_else(|| approvalgate_approval::LOGIN_PATH.to_string())
}
