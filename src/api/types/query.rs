//! Query and analytics wire types

use serde::{Deserialize, Serialize};

use crate::domain::AnalyticsSnapshot;
use crate::infrastructure::services::QueryAnswer;

/// Body of a query request
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Calling application, used only for log correlation
    #[serde(default)]
    pub application: Option<String>,
}

/// Answer to a query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    pub cached: bool,
    /// Milliseconds spent serving the request
    pub latency: u64,
    pub cache_key: String,
}

impl From<QueryAnswer> for QueryResponse {
    fn from(answer: QueryAnswer) -> Self {
        Self {
            answer: answer.answer,
            cached: answer.was_cached,
            latency: answer.latency_ms,
            cache_key: answer.cache_key.to_string(),
        }
    }
}

/// Cache analytics report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub hit_rate: f64,
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_size: usize,
    pub cost_savings: f64,
    pub savings_percent: f64,
    pub strategies: Vec<String>,
}

impl From<AnalyticsSnapshot> for AnalyticsResponse {
    fn from(snapshot: AnalyticsSnapshot) -> Self {
        Self {
            hit_rate: round2(snapshot.hit_rate),
            total_requests: snapshot.total_requests,
            cache_hits: snapshot.cache_hits,
            cache_misses: snapshot.cache_misses,
            cache_size: snapshot.cache_size,
            cost_savings: round2(snapshot.cost_savings),
            savings_percent: round2(snapshot.savings_percent),
            strategies: snapshot.strategies,
        }
    }
}

/// Round to two decimal places for presentation
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
