use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::app::AppServices;
use crate::middleware::gate_middleware;

pub mod admin;
pub mod login;
pub mod pages;
pub mod system;

/// Router for every endpoint.
///
/// Page routes sit behind the access gate; the credential endpoints and
/// `/health` do not.
pub fn router(services: Arc<AppServices>) -> Router {
    let gate = || from_fn_with_state(services.clone(), gate_middleware);

    Router::new()
        .route("/health", get(system::health))
        .route("/login", get(login::page).route_layer(gate()))
        // route_layer only wraps the methods registered before it.
        .route(
            "/login/",
            get(login::page).route_layer(gate()).post(login::sign_in),
        )
        .route("/login/register", post(login::register))
        .route("/logout", post(login::logout))
        .nest("/admin", admin::router().route_layer(gate()))
        .fallback_service(get(pages::storefront).route_layer(gate()))
}
