//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Questions
        .route("/ask", post(handlers::ask))
        // History and statistics
        .route(
            "/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
}
