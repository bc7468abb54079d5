//! Query endpoint handler

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, QueryResponse};

/// POST /v1/query
pub async fn answer_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    debug!(
        application = request.application.as_deref().unwrap_or("-"),
        query_len = request.query.len(),
        "Answering query"
    );

    let answer = state
        .query_service
        .answer(&request.query)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(QueryResponse::from(answer)))
}
