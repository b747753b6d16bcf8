//! Cloudflare Access API client.
//!
//! Cloudflare Access has no standalone user object: the only durable trace
//! of an identity is an email rule inside a group's `include` list. This
//! crate provides the wire types for Access groups, the membership codec
//! that reads and writes those email rules, and a reqwest-based client
//! behind the [`AccessBackend`] trait so the provisioning engine can be
//! tested against a fake.

pub mod backend;
pub mod client;
pub mod error;
pub mod membership;
pub mod models;

pub use backend::AccessBackend;
pub use client::AccessClient;
pub use error::{AccessClientError, AccessClientResult};
pub use membership::{contains_email, member_emails, remove_email, EmailRule, MembershipEntry};
pub use models::{AccessGroup, GroupPage, ResultInfo, TokenStatus};
