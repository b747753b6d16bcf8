//! SCIM Group resource handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;

use crate::error::ScimError;
use crate::handlers::common::{parse_body, parse_query, scim_response, ListQuery};
use crate::models::{ScimAttributes, ScimPatchRequest};
use crate::services::ProvisioningEngine;

/// GET /scim/Groups
pub async fn list_groups(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ScimError> {
    let page = parse_query(query)?;
    let response = engine.list_groups(page).await?;
    Ok(scim_response(StatusCode::OK, response))
}

/// POST /scim/Groups
pub async fn create_group(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    body: Result<Json<ScimAttributes>, JsonRejection>,
) -> Result<Response, ScimError> {
    let attributes = parse_body(body)?;
    let group = engine.create_group(&attributes).await?;
    Ok(scim_response(StatusCode::CREATED, group))
}

/// GET /scim/Groups/:id
pub async fn get_group(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    let group = engine.get_group(&id).await?;
    Ok(scim_response(StatusCode::OK, group))
}

/// PUT /scim/Groups/:id
pub async fn replace_group(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
    body: Result<Json<ScimAttributes>, JsonRejection>,
) -> Result<Response, ScimError> {
    let attributes = parse_body(body)?;
    let group = engine.replace_group(&id, &attributes).await?;
    Ok(scim_response(StatusCode::OK, group))
}

/// PATCH /scim/Groups/:id
pub async fn patch_group(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
    body: Result<Json<ScimPatchRequest>, JsonRejection>,
) -> Result<Response, ScimError> {
    let request = parse_body(body)?;
    let group = engine.patch_group(&id, &request).await?;
    Ok(scim_response(StatusCode::OK, group))
}

/// DELETE /scim/Groups/:id
pub async fn delete_group(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    engine.delete_group(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
