//! Cost model and point-in-time analytics report

use serde::{Deserialize, Serialize};

use super::counters::AnalyticsCounters;
use crate::domain::DomainError;

/// Caching strategies the cache applies, in evaluation order
pub const STRATEGIES: [&str; 4] = [
    "exact match",
    "semantic similarity",
    "LRU eviction",
    "TTL expiration",
];

/// Constants for the upstream cost estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostModel {
    /// Tokens an average upstream generation consumes
    #[serde(default = "default_avg_tokens_per_request")]
    pub avg_tokens_per_request: u64,

    /// Upstream price per token in USD
    #[serde(default = "default_cost_per_token")]
    pub cost_per_token: f64,
}

fn default_avg_tokens_per_request() -> u64 {
    500
}

fn default_cost_per_token() -> f64 {
    0.50 / 1_000_000.0
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            avg_tokens_per_request: default_avg_tokens_per_request(),
            cost_per_token: default_cost_per_token(),
        }
    }
}

impl CostModel {
    pub fn new(avg_tokens_per_request: u64, cost_per_token: f64) -> Self {
        Self {
            avg_tokens_per_request,
            cost_per_token,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.cost_per_token.is_finite() || self.cost_per_token < 0.0 {
            return Err(DomainError::configuration(format!(
                "analytics.cost_per_token must be a non-negative number, got {}",
                self.cost_per_token
            )));
        }

        Ok(())
    }

    /// Cost of generating `requests` answers upstream
    pub fn cost_of(&self, requests: u64) -> f64 {
        requests as f64 * self.avg_tokens_per_request as f64 * self.cost_per_token
    }
}

/// Analytics derived from counters, cache size and the cost model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub exact_hits: u64,
    pub semantic_hits: u64,
    pub cache_size: usize,
    pub hit_rate: f64,
    /// Upstream spend avoided: baseline cost of every request minus cost of misses
    pub cost_savings: f64,
    /// Hit rate expressed as a percentage
    pub savings_percent: f64,
    pub strategies: Vec<String>,
}

impl AnalyticsSnapshot {
    pub fn compute(counters: &AnalyticsCounters, cache_size: usize, cost_model: &CostModel) -> Self {
        let baseline = cost_model.cost_of(counters.total_requests());
        let actual = cost_model.cost_of(counters.cache_misses());
        let hit_rate = counters.hit_rate();

        Self {
            total_requests: counters.total_requests(),
            cache_hits: counters.cache_hits(),
            cache_misses: counters.cache_misses(),
            exact_hits: counters.exact_hits(),
            semantic_hits: counters.semantic_hits(),
            cache_size,
            hit_rate,
            cost_savings: baseline - actual,
            savings_percent: hit_rate * 100.0,
            strategies: STRATEGIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
