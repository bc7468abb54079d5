//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::QueryServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone, Debug)]
pub struct AppState {
    pub query_service: Arc<dyn QueryServiceTrait>,
}

impl AppState {
    pub fn new(query_service: Arc<dyn QueryServiceTrait>) -> Self {
        Self { query_service }
    }
}
