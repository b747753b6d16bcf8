//! SCIM HTTP handlers.

pub mod common;
pub mod discovery;
pub mod groups;
pub mod users;
