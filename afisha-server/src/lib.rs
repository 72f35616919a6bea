//! # Afisha Server
//!
//! REST API over `afisha-core`: random films from the upstream top lists,
//! the local film and cinema catalogue, routes between points and
//! geocoding. Everything except the health check is mounted under `/api`.

pub mod handlers;
pub mod infra;
pub mod routes;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::infra::config::CorsConfig;

pub use infra::app_state::{Adapters, AppState};

/// Build the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors_layer = if state.config.dev_mode {
        CorsLayer::permissive()
    } else {
        cors_layer(&state.config.cors)
    };

    Router::new()
        .route("/", get(handlers::health::health_handler))
        .merge(routes::create_api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
