pub mod api;

use crate::AppState;
use axum::Router;

/// Create the main API router
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/api", api::create_api_routes())
}
