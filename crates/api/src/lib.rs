//! HTTP API: storefront gate, login/registration, and the admin approval surface.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
