//! SCIM middleware.

pub mod auth;

pub use auth::{BearerAuthLayer, BearerAuthService};
