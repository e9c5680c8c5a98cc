//! API request handlers
use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::rag::Orchestrator;

pub mod query;

pub use query::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        system_name: state.orchestrator.system_name().to_string(),
        index_chunks: state.orchestrator.index_metadata().chunk_count,
    }))
}
