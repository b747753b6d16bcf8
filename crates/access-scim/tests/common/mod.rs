//! In-memory Access backend for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use access_client::{
    AccessBackend, AccessClientError, AccessClientResult, AccessGroup, GroupPage,
    MembershipEntry, ResultInfo,
};
use access_scim::models::{ScimAttributes, ScimPatchOp, ScimPatchRequest};
use access_scim::ProvisioningEngine;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

/// Number of calls per backend operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub get: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub revoke: usize,
}

#[derive(Default)]
struct FakeState {
    groups: BTreeMap<String, AccessGroup>,
    next_id: u32,
    total_pages: u32,
    calls: CallCounts,
    fail_updates: Option<(u16, String)>,
    fail_revoke: bool,
    revoked: Vec<String>,
}

/// Stores groups the way Cloudflare does: every response is a fresh
/// JSON decode, so include entries come back in raw shape.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend preloaded with `(id, name, emails)` groups.
    pub fn with_groups(groups: &[(&str, &str, &[&str])]) -> Arc<Self> {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            for (id, name, emails) in groups {
                let group = AccessGroup {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    include: emails.iter().map(|e| MembershipEntry::for_email(*e)).collect(),
                    created_at: Some(Utc::now()),
                    updated_at: Some(Utc::now()),
                    ..AccessGroup::default()
                };
                state.groups.insert(group.id.clone(), group);
            }
        }
        Arc::new(backend)
    }

    /// Insert or overwrite a group behind the engine's back.
    pub fn insert_raw(&self, group: AccessGroup) {
        self.state.lock().unwrap().groups.insert(group.id.clone(), group);
    }

    pub fn set_total_pages(&self, pages: u32) {
        self.state.lock().unwrap().total_pages = pages;
    }

    pub fn fail_updates(&self, status: u16, message: &str) {
        self.state.lock().unwrap().fail_updates = Some((status, message.to_string()));
    }

    pub fn fail_revoke(&self) {
        self.state.lock().unwrap().fail_revoke = true;
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls
    }

    pub fn revoked(&self) -> Vec<String> {
        self.state.lock().unwrap().revoked.clone()
    }

    pub fn stored(&self, id: &str) -> Option<AccessGroup> {
        self.state.lock().unwrap().groups.get(id).cloned()
    }

    /// Emails stored in a group, in include order.
    pub fn stored_emails(&self, id: &str) -> Vec<String> {
        self.stored(id)
            .map(|g| {
                g.include
                    .iter()
                    .filter_map(|m| m.email().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Round-trip through JSON like a real HTTP response.
fn wire(group: &AccessGroup) -> AccessGroup {
    serde_json::from_value(serde_json::to_value(group).unwrap()).unwrap()
}

#[async_trait]
impl AccessBackend for FakeBackend {
    async fn list_groups(&self) -> AccessClientResult<GroupPage> {
        let mut state = self.state.lock().unwrap();
        state.calls.list += 1;
        Ok(GroupPage {
            groups: state.groups.values().map(wire).collect(),
            result_info: ResultInfo {
                page: 1,
                per_page: 25,
                count: u32::try_from(state.groups.len()).unwrap(),
                total_count: u32::try_from(state.groups.len()).unwrap(),
                total_pages: state.total_pages.max(1),
            },
        })
    }

    async fn get_group(&self, id: &str) -> AccessClientResult<AccessGroup> {
        let mut state = self.state.lock().unwrap();
        state.calls.get += 1;
        state
            .groups
            .get(id)
            .map(wire)
            .ok_or_else(|| AccessClientError::NotFound(format!("group {id}")))
    }

    async fn create_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup> {
        let mut state = self.state.lock().unwrap();
        state.calls.create += 1;
        state.next_id += 1;

        let mut stored = wire(group);
        stored.id = format!("grp-{}", state.next_id);
        stored.created_at = Some(Utc::now());
        stored.updated_at = stored.created_at;
        state.groups.insert(stored.id.clone(), stored.clone());
        Ok(wire(&stored))
    }

    async fn update_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup> {
        let mut state = self.state.lock().unwrap();
        state.calls.update += 1;
        if let Some((status, message)) = state.fail_updates.clone() {
            return Err(AccessClientError::Api { status, message });
        }

        let created_at = match state.groups.get(&group.id) {
            Some(existing) => existing.created_at,
            None => return Err(AccessClientError::NotFound(format!("group {}", group.id))),
        };
        let mut stored = wire(group);
        stored.created_at = created_at;
        stored.updated_at = Some(Utc::now());
        state.groups.insert(stored.id.clone(), stored.clone());
        Ok(wire(&stored))
    }

    async fn delete_group(&self, id: &str) -> AccessClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.delete += 1;
        state
            .groups
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AccessClientError::NotFound(format!("group {id}")))
    }

    async fn revoke_user_tokens(&self, email: &str) -> AccessClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.revoke += 1;
        if state.fail_revoke {
            return Err(AccessClientError::Api {
                status: 500,
                message: "10001: service unavailable".to_string(),
            });
        }
        state.revoked.push(email.to_string());
        Ok(())
    }
}

pub fn engine(backend: &Arc<FakeBackend>) -> ProvisioningEngine {
    ProvisioningEngine::new(backend.clone())
}

/// SCIM attribute map from a JSON object literal.
pub fn attrs(value: Value) -> ScimAttributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub fn add_members(emails: &[&str]) -> ScimPatchOp {
    let value: Vec<Value> = emails.iter().map(|e| json!({ "value": e })).collect();
    ScimPatchOp::new("add", Some("members"), Some(Value::Array(value)))
}

pub fn remove_member(email: &str) -> ScimPatchOp {
    let path = format!("members[value eq \"{email}\"]");
    ScimPatchOp::new("remove", Some(path.as_str()), None)
}

pub fn patch(operations: Vec<ScimPatchOp>) -> ScimPatchRequest {
    ScimPatchRequest::new(operations)
}
