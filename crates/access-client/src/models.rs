//! Cloudflare Access API wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::membership::MembershipEntry;

/// An Access group.
///
/// `include` carries the membership list. `exclude` and `require` are kept
/// opaque so a read-modify-write cycle does not lose them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessGroup {
    /// Backend-assigned identifier. Empty until the group is created.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Group name (SCIM `displayName`).
    pub name: String,

    /// Membership rules.
    #[serde(default)]
    pub include: Vec<MembershipEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccessGroup {
    /// A not-yet-created group with the given name and members.
    pub fn new(name: impl Into<String>, include: Vec<MembershipEntry>) -> Self {
        Self {
            name: name.into(),
            include,
            ..Self::default()
        }
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of groups as returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPage {
    pub groups: Vec<AccessGroup>,
    pub result_info: ResultInfo,
}

/// Result of the API token verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatus {
    pub id: String,
    pub status: String,
}

/// Message entry in the `errors`/`messages` arrays of an API envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Standard Cloudflare v4 response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiEnvelope<T> {
    /// Joined `code: message` pairs from the `errors` array.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
