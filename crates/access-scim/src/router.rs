//! SCIM 2.0 router configuration

use axum::{routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{discovery, groups, users};
use crate::middleware::BearerAuthLayer;
use crate::services::ProvisioningEngine;

/// SCIM resource and discovery routes, all behind Bearer auth.
///
/// Mount at `/scim`:
/// - GET/POST /Users
/// - GET/PUT/PATCH/DELETE /Users/:id
/// - GET/POST /Groups
/// - GET/PUT/PATCH/DELETE /Groups/:id
/// - GET /ServiceProviderConfig, /ResourceTypes, /Schemas
pub fn scim_resource_router(engine: Arc<ProvisioningEngine>, bearer_token: impl Into<String>) -> Router {
    Router::new()
        .route("/Users", get(users::list_users).post(users::create_user))
        .route(
            "/Users/:id",
            get(users::get_user)
                .put(users::replace_user)
                .patch(users::patch_user)
                .delete(users::delete_user),
        )
        .route(
            "/Groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            "/Groups/:id",
            get(groups::get_group)
                .put(groups::replace_group)
                .patch(groups::patch_group)
                .delete(groups::delete_group),
        )
        .route(
            "/ServiceProviderConfig",
            get(discovery::service_provider_config),
        )
        .route("/ResourceTypes", get(discovery::resource_types))
        .route("/Schemas", get(discovery::schemas))
        .layer(BearerAuthLayer::new(bearer_token))
        .layer(Extension(engine))
}

/// Full application router: SCIM under `/scim` with request tracing.
pub fn scim_router(engine: Arc<ProvisioningEngine>, bearer_token: impl Into<String>) -> Router {
    Router::new()
        .nest("/scim", scim_resource_router(engine, bearer_token))
        .layer(TraceLayer::new_for_http())
}
