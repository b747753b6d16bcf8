//! Provisioning engine: every SCIM operation against Cloudflare Access.
//!
//! One mutex serializes all operations end to end, backend round-trips
//! included. The group cache and the pending user set are only written
//! after the backend accepted a change.

use std::sync::Arc;
use std::time::Duration;

use access_client::{contains_email, remove_email, AccessBackend, AccessGroup, MembershipEntry};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::directory::{collect_users, PendingUsers};
use super::group_cache::GroupCache;
use super::pagination::windowed;
use super::patch::apply_operations;
use crate::error::{ScimError, ScimResult};
use crate::models::{
    GroupAttributes, ScimAttributes, ScimGroup, ScimGroupListResponse, ScimPagination,
    ScimPatchRequest, ScimUser, ScimUserListResponse,
};

struct EngineState {
    cache: GroupCache,
    pending: PendingUsers,
}

/// Translates SCIM resources to Access groups and back.
pub struct ProvisioningEngine {
    backend: Arc<dyn AccessBackend>,
    state: Mutex<EngineState>,
}

impl ProvisioningEngine {
    pub fn new(backend: Arc<dyn AccessBackend>) -> Self {
        Self::with_cache(backend, GroupCache::new())
    }

    /// Engine whose group snapshot expires after `ttl`. Production code
    /// uses [`ProvisioningEngine::new`] and its fixed TTL; this exists for tests.
    #[doc(hidden)]
    pub fn with_cache_ttl(backend: Arc<dyn AccessBackend>, ttl: Duration) -> Self {
        Self::with_cache(backend, GroupCache::with_ttl(ttl))
    }

    fn with_cache(backend: Arc<dyn AccessBackend>, cache: GroupCache) -> Self {
        Self {
            backend,
            state: Mutex::new(EngineState {
                cache,
                pending: PendingUsers::new(),
            }),
        }
    }

    // ── Groups ────────────────────────────────────────────────────────

    pub async fn create_group(&self, attributes: &ScimAttributes) -> ScimResult<ScimGroup> {
        let attrs = GroupAttributes::from_attributes(attributes)?;
        let mut state = self.state.lock().await;
        info!(display_name = %attrs.display_name, members = attrs.members.len(), "Creating group");

        let draft = access_group(&attrs);
        let group = self.backend.create_group(&draft).await?;

        for email in &attrs.members {
            state.pending.remove(email);
        }
        let resource = ScimGroup::from_access_group(&group);
        state.cache.put(group);
        Ok(resource)
    }

    pub async fn get_group(&self, id: &str) -> ScimResult<ScimGroup> {
        let mut state = self.state.lock().await;
        debug!(group_id = %id, "Getting group");

        let group = state.cache.get(self.backend.as_ref(), id).await?;
        Ok(ScimGroup::from_access_group(&group))
    }

    /// Groups sorted by name then id, windowed.
    pub async fn list_groups(&self, page: ScimPagination) -> ScimResult<ScimGroupListResponse> {
        let mut state = self.state.lock().await;
        debug!(start_index = page.start_index, count = page.count, "Listing groups");

        let mut groups = state.cache.get_all(self.backend.as_ref()).await?;
        groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let (window, total) = windowed(groups, page.start_index, page.count);
        let resources = window.iter().map(ScimGroup::from_access_group).collect();
        Ok(ScimGroupListResponse::new(resources, total, page.start_index))
    }

    /// Apply membership operations, writing the group back at most once.
    pub async fn patch_group(&self, id: &str, request: &ScimPatchRequest) -> ScimResult<ScimGroup> {
        request.validate().map_err(ScimError::BadRequest)?;

        let mut state = self.state.lock().await;
        info!(group_id = %id, operations = request.operations.len(), "Patching group");

        let original = state.cache.get(self.backend.as_ref(), id).await?;
        let mut group = original.clone();
        let outcome = apply_operations(&mut group, &request.operations)?;

        if !outcome.modified {
            debug!(group_id = %id, "Patch left group unchanged");
            return Ok(ScimGroup::from_access_group(&original));
        }

        let updated = self.backend.update_group(&group).await?;
        for email in outcome.touched() {
            state.pending.remove(email);
        }
        let resource = ScimGroup::from_access_group(&updated);
        state.cache.put(updated);
        Ok(resource)
    }

    /// Overwrite name and members. Other include rules, `exclude` and
    /// `require` are not sent and so are dropped by the backend.
    pub async fn replace_group(&self, id: &str, attributes: &ScimAttributes) -> ScimResult<ScimGroup> {
        let attrs = GroupAttributes::from_attributes(attributes)?;
        let mut state = self.state.lock().await;
        info!(group_id = %id, display_name = %attrs.display_name, "Replacing group");

        let mut draft = access_group(&attrs);
        draft.id = id.to_string();
        let group = self.backend.update_group(&draft).await?;

        for email in &attrs.members {
            state.pending.remove(email);
        }
        let resource = ScimGroup::from_access_group(&group);
        state.cache.put(group);
        Ok(resource)
    }

    pub async fn delete_group(&self, id: &str) -> ScimResult<()> {
        let mut state = self.state.lock().await;
        info!(group_id = %id, "Deleting group");

        self.backend.delete_group(id).await?;
        state.cache.remove(id);
        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────────────

    /// Register a user that is not in any group yet.
    pub async fn create_user(&self, attributes: &ScimAttributes) -> ScimResult<ScimUser> {
        let email = ScimUser::user_name_from(attributes)?;
        let mut state = self.state.lock().await;
        info!(user = %email, "Creating user");

        state.pending.insert(email.clone());
        Ok(ScimUser::for_email(email, true))
    }

    pub async fn get_user(&self, id: &str) -> ScimResult<ScimUser> {
        let mut state = self.state.lock().await;
        debug!(user = %id, "Getting user");

        if state.pending.contains(id) {
            return Ok(ScimUser::for_email(id, true));
        }
        let groups = state.cache.get_all(self.backend.as_ref()).await?;
        if groups.iter().any(|g| contains_email(&g.include, id)) {
            Ok(ScimUser::for_email(id, true))
        } else {
            Err(ScimError::NotFound(id.to_string()))
        }
    }

    /// Users derived from group membership plus pending users, windowed.
    pub async fn list_users(&self, page: ScimPagination) -> ScimResult<ScimUserListResponse> {
        let mut state = self.state.lock().await;
        debug!(start_index = page.start_index, count = page.count, "Listing users");

        let EngineState { cache, pending } = &mut *state;
        let groups = cache.get_all(self.backend.as_ref()).await?;
        let users = collect_users(&groups, pending);

        let (window, total) = windowed(users, page.start_index, page.count);
        let resources = window
            .into_iter()
            .map(|email| ScimUser::for_email(email, true))
            .collect();
        Ok(ScimUserListResponse::new(resources, total, page.start_index))
    }

    /// Replace a user. Only `active` is honoured: `false` removes the user
    /// from every group and revokes their Access tokens.
    pub async fn replace_user(&self, id: &str, attributes: &ScimAttributes) -> ScimResult<ScimUser> {
        let active = ScimUser::active_from(attributes)?;
        let mut state = self.state.lock().await;
        info!(user = %id, active, "Replacing user");

        if !active {
            let groups = state.cache.get_all(self.backend.as_ref()).await?;
            for mut group in groups {
                if !remove_email(&mut group.include, id) {
                    continue;
                }
                debug!(user = %id, group_id = %group.id, "Removing deactivated user from group");
                let updated = self.backend.update_group(&group).await?;
                state.cache.put(updated);
            }

            if let Err(e) = self.backend.revoke_user_tokens(id).await {
                warn!(user = %id, status = ?e.status(), error = %e, "Failed to revoke Access tokens");
            }
        }

        Ok(ScimUser::for_email(id, active))
    }

    /// Forget a pending user. Group memberships are left alone.
    pub async fn delete_user(&self, id: &str) -> ScimResult<()> {
        let mut state = self.state.lock().await;
        info!(user = %id, "Deleting user");

        state.pending.remove(id);
        Ok(())
    }

    pub async fn patch_user(&self, id: &str) -> ScimResult<ScimUser> {
        debug!(user = %id, "User patch requested");
        Err(ScimError::NotImplemented("PATCH on Users".to_string()))
    }

    /// Whether `email` is in the pending user set.
    pub async fn is_pending(&self, email: &str) -> bool {
        self.state.lock().await.pending.contains(email)
    }
}

fn access_group(attrs: &GroupAttributes) -> AccessGroup {
    AccessGroup::new(
        attrs.display_name.clone(),
        attrs
            .members
            .iter()
            .map(MembershipEntry::for_email)
            .collect(),
    )
}
