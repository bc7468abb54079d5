//! Cache entry and vector index entry

use chrono::{DateTime, TimeDelta, Utc};

use super::key::Fingerprint;

/// A cached answer keyed by query fingerprint
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    key: Fingerprint,
    answer: String,
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: Fingerprint, answer: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            key,
            answer: answer.into(),
            created_at,
        }
    }

    pub fn key(&self) -> &Fingerprint {
        &self.key
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Age at `now`; negative if the clock moved backwards
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.created_at
    }

    /// An entry is expired once its age strictly exceeds the TTL
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.age(now) > ttl
    }
}

/// Embedding stored alongside a cache entry for semantic lookup
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndexEntry {
    key: Fingerprint,
    embedding: Vec<f32>,
}

impl VectorIndexEntry {
    pub fn new(key: Fingerprint, embedding: Vec<f32>) -> Self {
        Self { key, embedding }
    }

    pub fn key(&self) -> &Fingerprint {
        &self.key
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub(super) fn replace_embedding(&mut self, embedding: Vec<f32>) {
        self.embedding = embedding;
    }
}
