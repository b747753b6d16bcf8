//! SCIM response and message schemas (RFC 7644).

use serde::{Deserialize, Serialize};

use super::scim_group::ScimGroup;
use super::scim_user::ScimUser;

/// Loosely typed resource attributes as sent by SCIM clients.
pub type ScimAttributes = serde_json::Map<String, serde_json::Value>;

/// SCIM List Response (RFC 7644 Section 3.4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimListResponse<T> {
    pub schemas: Vec<String>,

    /// Size of the whole collection, not of this page.
    pub total_results: usize,

    /// 1-based index of the first result in this page.
    pub start_index: i64,

    pub items_per_page: usize,

    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}

impl<T> ScimListResponse<T> {
    /// SCIM List Response schema URI.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

    #[must_use]
    pub fn new(resources: Vec<T>, total_results: usize, start_index: i64) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            total_results,
            start_index,
            items_per_page: resources.len(),
            resources,
        }
    }
}

pub type ScimUserListResponse = ScimListResponse<ScimUser>;

pub type ScimGroupListResponse = ScimListResponse<ScimGroup>;

/// SCIM PATCH operation (RFC 7644 Section 3.5.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimPatchOp {
    /// Operation type, case-insensitive.
    pub op: String,

    /// Attribute path (e.g. `members`, `members[value eq "a@b.c"]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl ScimPatchOp {
    pub fn new(op: &str, path: Option<&str>, value: Option<serde_json::Value>) -> Self {
        Self {
            op: op.to_string(),
            path: path.map(str::to_string),
            value,
        }
    }
}

/// SCIM PATCH request (RFC 7644 Section 3.5.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimPatchRequest {
    pub schemas: Vec<String>,

    #[serde(rename = "Operations")]
    pub operations: Vec<ScimPatchOp>,
}

impl ScimPatchRequest {
    /// SCIM Patch Operation schema URI.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

    /// Build a request carrying the PatchOp schema.
    #[must_use]
    pub fn new(operations: Vec<ScimPatchOp>) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            operations,
        }
    }

    /// Validate the message envelope. Individual operations are checked
    /// when they are applied.
    pub fn validate(&self) -> Result<(), String> {
        if !self.schemas.iter().any(|s| s == Self::SCHEMA) {
            return Err("Missing PatchOp schema".to_string());
        }
        if self.operations.is_empty() {
            return Err("PATCH request has no operations".to_string());
        }
        Ok(())
    }
}

/// Pagination parameters from query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScimPagination {
    /// 1-based start index.
    pub start_index: i64,
    /// Items per page, `0..=MAX_COUNT`.
    pub count: i64,
}

impl Default for ScimPagination {
    fn default() -> Self {
        Self::from_query(None, None)
    }
}

impl ScimPagination {
    pub const DEFAULT_COUNT: i64 = 100;

    pub const MAX_COUNT: i64 = 100;

    /// Create pagination from query parameters.
    #[must_use]
    pub fn from_query(start_index: Option<i64>, count: Option<i64>) -> Self {
        Self {
            start_index: start_index.unwrap_or(1).max(1),
            count: count
                .unwrap_or(Self::DEFAULT_COUNT)
                .clamp(0, Self::MAX_COUNT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response() {
        let response = ScimListResponse::new(vec!["a", "b"], 10, 3);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["totalResults"], 10);
        assert_eq!(value["startIndex"], 3);
        assert_eq!(value["itemsPerPage"], 2);
        assert_eq!(value["Resources"], json!(["a", "b"]));
        assert_eq!(value["schemas"][0], ScimListResponse::<()>::SCHEMA);
    }

    #[test]
    fn test_patch_request_deserialize() {
        let request: ScimPatchRequest = serde_json::from_value(json!({
            "schemas": [ScimPatchRequest::SCHEMA],
            "Operations": [
                { "op": "Add", "path": "members", "value": [{ "value": "a@x.com" }] },
                { "op": "remove", "path": "members[value eq \"b@x.com\"]" }
            ]
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.operations.len(), 2);
        assert_eq!(request.operations[0].op, "Add");
        assert!(request.operations[1].value.is_none());
    }

    #[test]
    fn test_patch_request_validation() {
        let no_schema = ScimPatchRequest {
            schemas: vec![],
            operations: vec![ScimPatchOp::new("add", Some("members"), None)],
        };
        assert!(no_schema.validate().is_err());

        let empty = ScimPatchRequest::new(vec![]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_pagination() {
        let p = ScimPagination::from_query(Some(26), Some(25));
        assert_eq!(p.start_index, 26);
        assert_eq!(p.count, 25);

        let default = ScimPagination::default();
        assert_eq!(default.start_index, 1);
        assert_eq!(default.count, 100);

        let clamped = ScimPagination::from_query(Some(0), Some(-5));
        assert_eq!(clamped.start_index, 1);
        assert_eq!(clamped.count, 0);

        let max = ScimPagination::from_query(Some(1), Some(500));
        assert_eq!(max.count, 100);
    }
}
