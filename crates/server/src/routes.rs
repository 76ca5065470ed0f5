use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use axum::middleware;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::{self, AppState};
use crate::errors::ApiError;
use crate::openapi;

pub mod users;
pub mod subscriptions;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the subtrack API" }))
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("route not found".into())
}

/// Build the full application router: public auth routes, the protected
/// group behind the bearer-token middleware, docs, and the 404 fallback.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // Public routes (registration and login issue the token)
    let public = Router::new()
        .route("/", get(welcome))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login));

    // Protected routes; identity is attached by the middleware
    let protected = Router::new()
        .route(
            "/users/me",
            get(users::profile).put(users::update_profile).delete(users::delete_account),
        )
        .route(
            "/subscriptions",
            post(subscriptions::create).get(subscriptions::list),
        )
        .route(
            "/subscriptions/:id",
            get(subscriptions::get_one).put(subscriptions::update).delete(subscriptions::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    let api_v1 = public.merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_v1)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .fallback(unknown_route)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
