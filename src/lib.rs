//! PMP Response Cache
//!
//! A cache in front of a slow upstream answer generator with support for:
//! - Exact matching on a fingerprint of the normalized query
//! - Semantic matching on query embeddings above a similarity threshold
//! - TTL expiry and size-bounded LRU eviction
//! - Hit-rate and cost-savings analytics

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::generator::SimulatedGenerator;
use infrastructure::services::QueryService;
use tracing::info;

/// Create the application state with custom configuration
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let generator = Arc::new(SimulatedGenerator::from_config(&config.generator));

    let query_service = QueryService::builder(generator)
        .config(config.cache.clone())
        .cost_model(config.analytics)
        .build()?;

    info!(
        max_entries = config.cache.max_entries,
        ttl_secs = config.cache.ttl_secs,
        similarity_threshold = config.cache.similarity_threshold,
        upstream_latency_ms = config.generator.latency_ms,
        "Response cache initialized"
    );

    Ok(AppState::new(Arc::new(query_service)))
}
