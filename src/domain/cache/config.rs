//! Response cache configuration

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for the response cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Similarity a semantic match must strictly exceed (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum number of entries held at once
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum age of an entry in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Dimension of query embeddings
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
}

fn default_similarity_threshold() -> f32 {
    0.95
}

fn default_max_entries() -> usize {
    2000
}

fn default_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_embedding_dimensions() -> usize {
    10
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
            embedding_dimensions: default_embedding_dimensions(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL window as a signed time delta, saturating for absurd values
    pub fn ttl(&self) -> TimeDelta {
        i64::try_from(self.ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = dimensions;
        self
    }

    /// Reject values the store cannot operate with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_entries == 0 {
            return Err(DomainError::configuration(
                "cache.max_entries must be greater than zero",
            ));
        }

        if self.embedding_dimensions == 0 {
            return Err(DomainError::configuration(
                "cache.embedding_dimensions must be greater than zero",
            ));
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DomainError::configuration(format!(
                "cache.similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        Ok(())
    }
}
