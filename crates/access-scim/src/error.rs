//! SCIM error types conforming to RFC 7644 Section 3.12

use access_client::AccessClientError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::handlers::common::SCIM_CONTENT_TYPE;

/// SCIM error types (RFC 7644 Section 3.12) this service can emit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScimErrorType {
    /// Filter syntax is invalid
    InvalidFilter,
    /// Request syntax is invalid
    InvalidSyntax,
    /// Attribute path is invalid
    InvalidPath,
    /// Attribute value is invalid
    InvalidValue,
}

impl std::fmt::Display for ScimErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScimErrorType::InvalidFilter => "invalidFilter",
            ScimErrorType::InvalidSyntax => "invalidSyntax",
            ScimErrorType::InvalidPath => "invalidPath",
            ScimErrorType::InvalidValue => "invalidValue",
        };
        write!(f, "{s}")
    }
}

/// SCIM error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimErrorResponse {
    /// Always ["urn:ietf:params:scim:api:messages:2.0:Error"]
    pub schemas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<String>,
    pub detail: String,
    /// HTTP status code as string
    pub status: String,
}

impl ScimErrorResponse {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:Error";

    pub fn new(
        status: StatusCode,
        detail: impl Into<String>,
        scim_type: Option<ScimErrorType>,
    ) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            scim_type: scim_type.map(|t| t.to_string()),
            detail: detail.into(),
            status: status.as_u16().to_string(),
        }
    }
}

/// Errors produced by the provisioning engine and the SCIM transport.
#[derive(Debug, Error)]
pub enum ScimError {
    /// Missing or wrong bearer token
    #[error("Invalid or missing bearer token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Malformed request or unsupported operation
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Attribute present but of the wrong type
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid PATCH operation: {0}")]
    InvalidPatchOp(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Cloudflare rejected a call. `status` is the status it answered with.
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    /// The group listing spans more than one page.
    #[error("Cloudflare returned {total_pages} pages of groups; paging is not supported")]
    UnsupportedPagination { total_pages: u32 },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ScimError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScimError::Unauthorized => StatusCode::UNAUTHORIZED,
            ScimError::NotFound(_) => StatusCode::NOT_FOUND,
            ScimError::BadRequest(_)
            | ScimError::InvalidValue(_)
            | ScimError::InvalidPatchOp(_)
            | ScimError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ScimError::Backend { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ScimError::UnsupportedPagination { .. } | ScimError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ScimError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Get the SCIM error type for this error
    #[must_use]
    pub fn scim_type(&self) -> Option<ScimErrorType> {
        match self {
            ScimError::BadRequest(_) => Some(ScimErrorType::InvalidSyntax),
            ScimError::InvalidValue(_) => Some(ScimErrorType::InvalidValue),
            ScimError::InvalidPatchOp(_) => Some(ScimErrorType::InvalidPath),
            ScimError::InvalidFilter(_) => Some(ScimErrorType::InvalidFilter),
            _ => None,
        }
    }

    /// Convert to SCIM error response
    #[must_use]
    pub fn to_response(&self) -> ScimErrorResponse {
        ScimErrorResponse::new(self.status_code(), self.to_string(), self.scim_type())
    }
}

impl From<AccessClientError> for ScimError {
    fn from(err: AccessClientError) -> Self {
        match err {
            AccessClientError::Api { status, message } => ScimError::Backend {
                status,
                detail: format!("Cloudflare error: {message}"),
            },
            AccessClientError::NotFound(message) => ScimError::Backend {
                status: 404,
                detail: format!("Cloudflare error: {message}"),
            },
            other => {
                tracing::error!(error = %other, "Cloudflare request failed");
                ScimError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ScimError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.to_response())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(SCIM_CONTENT_TYPE),
        );

        response
    }
}

/// Result type alias for SCIM operations
pub type ScimResult<T> = Result<T, ScimError>;
