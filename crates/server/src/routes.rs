pub mod auth;
pub mod resources;
pub mod users;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use service::crud::{CrudService, Resource};
use service::notes::{Note, SeaOrmNoteCollection};

use crate::openapi;
use crate::routes::resources::{resource_routes, ResourceController};
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::document(&[Note::RELATION]))
}

/// `notes` relation wired to its table and rule set.
pub fn notes_controller(state: &ServerState) -> anyhow::Result<Arc<ResourceController<Note>>> {
    let collection = Arc::new(SeaOrmNoteCollection::new(state.db.clone()));
    let service = CrudService::<Note>::new(collection);
    Ok(Arc::new(ResourceController::new(service, Note::descriptor()?, state.policy)))
}

/// Build the full application router: public routes, then everything behind `require_owner`.
pub fn build_router(state: ServerState, cors: CorsLayer) -> anyhow::Result<Router> {
    // Public routes (health, docs, signup, session)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/users", post(users::signup))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout));

    // Owner-scoped routes
    let protected = Router::new()
        .route("/api/users", get(users::list))
        .route("/api/users/:id", get(users::show).put(users::update).patch(users::update).delete(users::delete))
        .merge(resource_routes::<Note, ServerState>(notes_controller(&state)?))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_owner));

    // Compose
    Ok(public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // span per request at INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        ))
}
