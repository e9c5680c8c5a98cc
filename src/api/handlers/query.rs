//! Question and history handlers
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::*;
use crate::models::QueryResult;
use crate::models::QueryStats;

/// Answer a question (POST /api/ask)
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<ApiResponse<QueryResult>>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::bad_request("Please enter a question!"));
    }
    info!("POST /api/ask: {}", question);

    match state.orchestrator.process_query(question).await {
        Ok(result) => Ok(Json(ApiResponse::success(result))),
        Err(e) => {
            error!("Error processing query: {}", e);
            Err(e.into())
        }
    }
}

/// Full query history, oldest first (GET /api/history)
pub async fn get_history(State(state): State<AppState>) -> Json<ApiResponse<Vec<QueryResult>>> {
    Json(ApiResponse::success(state.orchestrator.history().await))
}

/// Clear the query history (DELETE /api/history)
pub async fn clear_history(State(state): State<AppState>) -> Json<ApiResponse<ClearHistoryResponse>> {
    let removed = state.orchestrator.clear_history().await;
    Json(ApiResponse::success(ClearHistoryResponse { removed }))
}

/// Query statistics (GET /api/stats)
pub async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<QueryStats>> {
    Json(ApiResponse::success(state.orchestrator.stats().await))
}
