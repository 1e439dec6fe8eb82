pub mod auth;
pub mod services;
pub mod workflow;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, authenticated, and
/// admin-only surfaces, plus Swagger UI.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (no token needed)
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/services", get(services::list))
        .route("/services/categories", get(services::categories))
        .route("/services/featured", get(services::featured))
        .route("/services/:id", get(services::detail));

    // Authenticated routes
    let authed = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/services", post(services::create))
        .route("/services/:id", put(services::update))
        .route("/services/:id", delete(services::delete))
        .route("/services/:id/history", get(services::history))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // Admin-only routes
    let admin = Router::new()
        .route("/services/:id/duplicate", post(services::duplicate))
        .route("/services/:id/template", post(workflow::save_template))
        .route("/services/bulk-delete", post(services::bulk_delete))
        .route("/services/bulk-publish", post(services::bulk_publish))
        .route("/admin/services", get(services::admin_list))
        .route("/admin/drafts", post(workflow::save_draft))
        .route("/admin/drafts/auto-save", post(workflow::auto_save))
        .route("/admin/templates", get(workflow::list_templates))
        .route("/admin/templates/:id", delete(workflow::delete_template))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    public
        .merge(authed)
        .merge(admin)
        .merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
