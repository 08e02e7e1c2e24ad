use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use approvalgate_core::GateError;

pub fn gate_error_to_response(err: GateError) -> Response {
    match err {
        GateError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        GateError::PermissionDenied(msg) => json_error(StatusCode::FORBIDDEN, "permission_denied", msg),
        GateError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        GateError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        GateError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg)
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `303 See Other` to `location`, used after a successful form post.
pub fn see_other(location: &str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())]).into_response()
}
