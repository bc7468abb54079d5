//! Analytics endpoint handler

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{AnalyticsResponse, ApiError, Json};

/// GET /v1/analytics
pub async fn get_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let snapshot = state.query_service.analytics().map_err(ApiError::from)?;

    Ok(Json(AnalyticsResponse::from(snapshot)))
}
