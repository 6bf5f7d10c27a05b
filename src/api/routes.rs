//! Application route configuration.

use axum::{
    http::{header, Method},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{account_routes, auth_routes};
use super::middleware::{require_auth, resolve_identity};
use super::openapi::ApiDoc;
use super::AppState;
use crate::errors::AppError;

/// Create the application router with all routes configured.
///
/// Public routes (registration, activation, login, health, docs) carry no
/// authentication middleware at all. Account routes sit behind the
/// resolve/require pair; `resolve_identity` is attached last so it runs
/// first and populates the identity `require_auth` checks.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes
        .merge(auth_routes())
        // Protected account routes
        .merge(
            account_routes()
                .route_layer(middleware::from_fn(require_auth))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    resolve_identity,
                )),
        )
        .fallback(fallback)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to FinTrack API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness probe; reports process health only
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Unknown routes get the standard error envelope instead of a bare 404
async fn fallback() -> AppError {
    AppError::NotFound
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}
