//! Shared helpers for SCIM handlers.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::Query,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{ScimError, ScimResult};
use crate::models::ScimPagination;

/// SCIM content type header.
pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";

/// Wrap response with SCIM content type.
pub fn scim_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SCIM_CONTENT_TYPE),
    );
    response
}

/// Query parameters of list endpoints. Filtering and sorting are not
/// supported, so their parameters are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_index: Option<i64>,
    pub count: Option<i64>,
}

impl ListQuery {
    #[must_use]
    pub fn pagination(&self) -> ScimPagination {
        ScimPagination::from_query(self.start_index, self.count)
    }
}

/// Unwrap a JSON body, turning extractor failures into SCIM 400s.
pub fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> ScimResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ScimError::BadRequest(rejection.body_text()))
}

/// Unwrap list query parameters, turning extractor failures into SCIM 400s.
pub fn parse_query(query: Result<Query<ListQuery>, QueryRejection>) -> ScimResult<ScimPagination> {
    query
        .map(|Query(q)| q.pagination())
        .map_err(|rejection| ScimError::BadRequest(rejection.body_text()))
}
