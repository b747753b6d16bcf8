//! SCIM User resource handlers.

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
use crate::models::ScimAttributes;
use crate::services::ProvisioningEngine;

/// GET /scim/Users
pub async fn list_users(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ScimError> {
    let page = parse_query(query)?;
    let response = engine.list_users(page).await?;
    Ok(scim_response(StatusCode::OK, response))
}

/// POST /scim/Users
pub async fn create_user(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    body: Result<Json<ScimAttributes>, JsonRejection>,
) -> Result<Response, ScimError> {
    let attributes = parse_body(body)?;
    let user = engine.create_user(&attributes).await?;
    Ok(scim_response(StatusCode::CREATED, user))
}

/// GET /scim/Users/:id
pub async fn get_user(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    let user = engine.get_user(&id).await?;
    Ok(scim_response(StatusCode::OK, user))
}

/// PUT /scim/Users/:id
pub async fn replace_user(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
    body: Result<Json<ScimAttributes>, JsonRejection>,
) -> Result<Response, ScimError> {
    let attributes = parse_body(body)?;
    let user = engine.replace_user(&id, &attributes).await?;
    Ok(scim_response(StatusCode::OK, user))
}

/// PATCH /scim/Users/:id
///
/// Always 501.
pub async fn patch_user(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    let user = engine.patch_user(&id).await?;
    Ok(scim_response(StatusCode::OK, user))
}

/// DELETE /scim/Users/:id
pub async fn delete_user(
    Extension(engine): Extension<Arc<ProvisioningEngine>>,
    Path(id): Path<String>,
) -> Result<Response, ScimError> {
    engine.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
