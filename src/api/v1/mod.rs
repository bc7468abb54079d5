//! v1 API endpoints

pub mod analytics;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::answer_query))
        .route("/analytics", get(analytics::get_analytics))
}
