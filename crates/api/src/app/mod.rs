//! HTTP application wiring.
//!
//! - `services.rs`: builds the account pipeline over the in-memory stack
//! - `routes/`: handlers, one file per surface
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: error and redirect responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use approvalgate_infra::LogMailTransport;

use crate::config::GateConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &GateConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config, Arc::new(LogMailTransport))?;
    Ok(build_app_with(Arc::new(services)))
}

/// Build the router over already-wired services.
pub fn build_app_with(services: Arc<AppServices>) -> Router {
    routes::router(services.clone()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(services)),
    )
}

pub use services::AppServices;
