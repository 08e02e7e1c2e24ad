//! `approvalgate-auth`: pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, role_permissions, AuthzError};
pub use permissions::Permission;
pub use principal::Actor;
pub use roles::Role;
