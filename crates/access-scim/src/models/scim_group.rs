//! SCIM Group resource schema (RFC 7643).

use access_client::{member_emails, AccessGroup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::scim_response::ScimAttributes;
use crate::error::{ScimError, ScimResult};

/// SCIM Group member reference. `value` is the member's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimGroupMember {
    pub value: String,
}

/// Resource metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimMeta {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Last-modified time in unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// SCIM Group resource (RFC 7643 Section 4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    pub schemas: Vec<String>,

    /// Access group id.
    pub id: String,

    /// Always the group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    pub display_name: String,

    /// Email members, sorted.
    #[serde(default)]
    pub members: Vec<ScimGroupMember>,

    pub meta: ScimMeta,
}

impl ScimGroup {
    /// SCIM Core Group schema URI.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:schemas:core:2.0:Group";

    /// Render an Access group as a SCIM resource.
    ///
    /// Only email rules show up as members; other include rules are invisible
    /// to SCIM clients.
    #[must_use]
    pub fn from_access_group(group: &AccessGroup) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            id: group.id.clone(),
            external_id: Some(group.name.clone()),
            display_name: group.name.clone(),
            members: member_emails(&group.include)
                .into_iter()
                .map(|value| ScimGroupMember { value })
                .collect(),
            meta: ScimMeta {
                resource_type: "Group".to_string(),
                created: group.created_at,
                last_modified: group.updated_at,
                version: group.updated_at.map(|t| t.timestamp().to_string()),
            },
        }
    }

    /// Member emails in resource order.
    pub fn member_values(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.value.as_str()).collect()
    }
}


/// Group attributes accepted on create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAttributes {
    pub display_name: String,
    /// Distinct member emails in request order.
    pub members: Vec<String>,
}

impl GroupAttributes {
    /// Read `displayName` and `members` from a SCIM attribute map.
    ///
    /// `members` entries without a non-empty string `value` are skipped.
    pub fn from_attributes(attributes: &ScimAttributes) -> ScimResult<Self> {
        let display_name = match attributes.get("displayName") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(ScimError::BadRequest("displayName is required".to_string()))
            }
            Some(_) => {
                return Err(ScimError::BadRequest(
                    "displayName must be a string".to_string(),
                ))
            }
        };

        let entries = match attributes.get("members") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(_) => {
                return Err(ScimError::BadRequest(
                    "members must be an array".to_string(),
                ))
            }
        };

        let mut members: Vec<String> = Vec::with_capacity(entries.len());
        for email in entries
            .iter()
            .filter_map(|m| m.get("value").and_then(Value::as_str))
            .filter(|e| !e.is_empty())
        {
            if !members.iter().any(|m| m == email) {
                members.push(email.to_string());
            }
        }

        Ok(Self {
            display_name,
            members,
        })
    }
}
