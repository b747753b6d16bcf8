//! SCIM 2.0 bridge to Cloudflare Access groups
//!
//! Cloudflare Access has no user object, so this crate keeps the whole
//! provisioning model in memory around the backend's groups:
//!
//! - a TTL snapshot of all Access groups, refreshed wholesale
//! - a virtual user directory derived from group membership plus
//!   locally created users that are not in any group yet
//! - a PATCH interpreter for group membership
//! - 1-based windowing for list responses
//!
//! Every protocol operation goes through [`ProvisioningEngine`], which
//! serializes them behind one lock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use access_scim::{scim_router, ProvisioningEngine};
//!
//! let engine = Arc::new(ProvisioningEngine::new(Arc::new(client)));
//! let app = scim_router(engine, bearer_token);
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use error::{ScimError, ScimResult};
pub use router::{scim_resource_router, scim_router};
pub use services::ProvisioningEngine;
