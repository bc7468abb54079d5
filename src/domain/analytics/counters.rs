//! Request outcome counters

use serde::{Deserialize, Serialize};

/// How a single lookup was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Fingerprint matched a live entry
    ExactHit,
    /// Embedding matched a live entry above the threshold
    SemanticHit,
    /// Answer came from the upstream generator
    Miss,
}

impl LookupOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, Self::Miss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactHit => "exact",
            Self::SemanticHit => "semantic",
            Self::Miss => "miss",
        }
    }
}

/// Monotonic request counters.
///
/// `record` bumps the total together with exactly one of hits or misses, so
/// any copy taken under the owning lock satisfies `total == hits + misses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsCounters {
    total_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
    exact_hits: u64,
    semantic_hits: u64,
}

impl AnalyticsCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: LookupOutcome) {
        self.total_requests += 1;

        match outcome {
            LookupOutcome::ExactHit => {
                self.cache_hits += 1;
                self.exact_hits += 1;
            }
            LookupOutcome::SemanticHit => {
                self.cache_hits += 1;
                self.semantic_hits += 1;
            }
            LookupOutcome::Miss => self.cache_misses += 1,
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }

    pub fn exact_hits(&self) -> u64 {
        self.exact_hits
    }

    pub fn semantic_hits(&self) -> u64 {
        self.semantic_hits
    }

    /// Fraction of requests served from cache; zero before any request
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }

        self.cache_hits as f64 / self.total_requests as f64
    }
}
