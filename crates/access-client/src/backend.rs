//! Backend seam used by the provisioning engine.

use async_trait::async_trait;

use crate::error::AccessClientResult;
use crate::models::{AccessGroup, GroupPage};

/// Group operations the provisioning engine needs from Cloudflare Access.
///
/// [`crate::AccessClient`] is the production implementation; tests supply
/// in-memory fakes.
#[async_trait]
pub trait AccessBackend: Send + Sync {
    /// List groups. Only the first page is requested.
    async fn list_groups(&self) -> AccessClientResult<GroupPage>;

    /// Fetch one group by id.
    async fn get_group(&self, id: &str) -> AccessClientResult<AccessGroup>;

    /// Create a group and return it as stored by the backend.
    async fn create_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup>;

    /// Overwrite the group identified by `group.id`.
    async fn update_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup>;

    /// Delete a group.
    async fn delete_group(&self, id: &str) -> AccessClientResult<()>;

    /// Revoke all Access tokens issued to `email`.
    async fn revoke_user_tokens(&self, email: &str) -> AccessClientResult<()>;
}
