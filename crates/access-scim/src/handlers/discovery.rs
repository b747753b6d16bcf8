//! SCIM 2.0 discovery endpoints (RFC 7643 Sections 5-7).

use axum::{http::StatusCode, response::Response};
use serde_json::json;

use crate::handlers::common::scim_response;
use crate::models::{ScimGroup, ScimListResponse, ScimUser};

/// GET /scim/ServiceProviderConfig
pub async fn service_provider_config() -> Response {
    let config = json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig"],
        "patch": { "supported": true },
        "bulk": {
            "supported": false,
            "maxOperations": 0,
            "maxPayloadSize": 0
        },
        "filter": {
            "supported": false,
            "maxResults": 0
        },
        "changePassword": { "supported": false },
        "sort": { "supported": false },
        "etag": { "supported": false },
        "authenticationSchemes": [
            {
                "type": "oauthbearertoken",
                "name": "OAuth Bearer Token",
                "description": "Authentication scheme using the OAuth Bearer Token Standard (RFC 6750)",
                "specUri": "https://www.rfc-editor.org/info/rfc6750",
                "primary": true
            }
        ],
        "meta": {
            "resourceType": "ServiceProviderConfig",
            "location": "/scim/ServiceProviderConfig"
        }
    });

    scim_response(StatusCode::OK, config)
}

/// GET /scim/ResourceTypes
pub async fn resource_types() -> Response {
    let resources = vec![
        json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:ResourceType"],
            "id": "User",
            "name": "User",
            "endpoint": "/Users",
            "description": "User Account",
            "schema": ScimUser::SCHEMA,
            "meta": {
                "resourceType": "ResourceType",
                "location": "/scim/ResourceTypes/User"
            }
        }),
        json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:ResourceType"],
            "id": "Group",
            "name": "Group",
            "endpoint": "/Groups",
            "description": "Group",
            "schema": ScimGroup::SCHEMA,
            "meta": {
                "resourceType": "ResourceType",
                "location": "/scim/ResourceTypes/Group"
            }
        }),
    ];

    let total = resources.len();
    scim_response(StatusCode::OK, ScimListResponse::new(resources, total, 1))
}

/// GET /scim/Schemas
///
/// Only the attributes this service reads or returns are described.
pub async fn schemas() -> Response {
    let resources = vec![
        json!({
            "id": ScimUser::SCHEMA,
            "name": "User",
            "description": "User Account",
            "attributes": [
                { "name": "userName", "type": "string", "multiValued": false, "required": true, "caseExact": true, "mutability": "readWrite", "returned": "default", "uniqueness": "server" },
                { "name": "active", "type": "boolean", "multiValued": false, "required": false, "mutability": "readWrite", "returned": "default" },
                { "name": "externalId", "type": "string", "multiValued": false, "required": false, "caseExact": true, "mutability": "readOnly", "returned": "default", "uniqueness": "none" }
            ],
            "meta": {
                "resourceType": "Schema",
                "location": format!("/scim/Schemas/{}", ScimUser::SCHEMA)
            }
        }),
        json!({
            "id": ScimGroup::SCHEMA,
            "name": "Group",
            "description": "Group",
            "attributes": [
                { "name": "displayName", "type": "string", "multiValued": false, "required": true, "caseExact": false, "mutability": "readWrite", "returned": "default", "uniqueness": "none" },
                { "name": "members", "type": "complex", "multiValued": true, "required": false, "mutability": "readWrite", "returned": "default",
                  "subAttributes": [
                      { "name": "value", "type": "string", "multiValued": false, "required": false, "caseExact": true, "mutability": "immutable", "returned": "default" }
                  ]
                }
            ],
            "meta": {
                "resourceType": "Schema",
                "location": format!("/scim/Schemas/{}", ScimGroup::SCHEMA)
            }
        }),
    ];

    let total = resources.len();
    scim_response(StatusCode::OK, ScimListResponse::new(resources, total, 1))
}
