use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware, require_auth};

pub mod genres;
pub mod movies;
pub mod recommendations;
pub mod reviews;
pub mod state;

pub use state::{AppState, Settings, Stores};

/// Creates the application router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/movies", get(movies::list))
        .route("/genres", get(genres::list))
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                // Innermost, so preflight responses keep a defaultable body
                .layer(cors_layer(allowed_origins)),
        )
}

/// Routes that require a valid access token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/movie/:imdb_id", get(movies::get))
        .route("/movie", post(movies::create))
        .route("/update-review/:imdb_id", patch(reviews::update))
        .route("/recommended-movies", get(recommendations::recommend))
        // Path used by existing clients
        .route("/recommanded-movies", get(recommendations::recommend))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
