//! Recency-ordered cache store with a parallel vector index

use std::collections::HashSet;
use std::num::NonZeroUsize;

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use tracing::debug;

use super::config::CacheConfig;
use super::entry::{CacheEntry, VectorIndexEntry};
use super::key::Fingerprint;
use crate::domain::embedding::{is_match, similarity};
use crate::domain::DomainError;

/// Result of an approximate lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub key: Fingerprint,
    pub similarity: f32,
}

/// Cache entries ordered by recency of use, plus an embedding per entry.
///
/// The entry map and the vector index always hold the same key set; every
/// mutation updates both before returning. The store is not synchronized:
/// callers own it behind a single lock.
///
/// Semantic lookup is a linear scan over the vector index, which is only
/// reasonable at bounded capacity. An approximate nearest-neighbor index can
/// replace it behind `probe_approximate`.
#[derive(Debug)]
pub struct CacheStore {
    entries: LruCache<Fingerprint, CacheEntry>,
    vectors: Vec<VectorIndexEntry>,
    similarity_threshold: f32,
}

impl CacheStore {
    pub fn new(capacity: NonZeroUsize, similarity_threshold: f32) -> Self {
        Self {
            entries: LruCache::new(capacity),
            vectors: Vec::with_capacity(capacity.get()),
            similarity_threshold,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let capacity = NonZeroUsize::new(config.max_entries).ok_or_else(|| {
            DomainError::configuration("cache.max_entries must be greater than zero")
        })?;

        Ok(Self::new(capacity, config.similarity_threshold))
    }

    /// Look up an entry by key without changing its recency
    pub fn probe_exact(&self, key: &Fingerprint) -> Option<&CacheEntry> {
        self.entries.peek(key)
    }

    /// First indexed entry, in insertion order, whose similarity to `vector`
    /// strictly exceeds the threshold
    pub fn probe_approximate(&self, vector: &[f32]) -> Option<SemanticMatch> {
        self.vectors.iter().find_map(|indexed| {
            let score = similarity(vector, indexed.embedding());

            is_match(score, self.similarity_threshold).then(|| SemanticMatch {
                key: indexed.key().clone(),
                similarity: score,
            })
        })
    }

    /// Mark `key` as most recently used. Returns false if absent.
    pub fn touch(&mut self, key: &Fingerprint) -> bool {
        if !self.entries.contains(key) {
            return false;
        }

        self.entries.promote(key);
        true
    }

    /// Add or replace the entry for `key` at the most-recently-used position.
    ///
    /// Returns the entry evicted to stay within capacity, if any. At most one
    /// entry is evicted since each insert grows the store by at most one.
    pub fn insert(
        &mut self,
        key: Fingerprint,
        answer: impl Into<String>,
        embedding: Vec<f32>,
        created_at: DateTime<Utc>,
    ) -> Option<CacheEntry> {
        let entry = CacheEntry::new(key.clone(), answer, created_at);
        let displaced = self.entries.push(key.clone(), entry);

        match self.vectors.iter_mut().find(|indexed| indexed.key() == &key) {
            Some(indexed) => indexed.replace_embedding(embedding),
            None => self.vectors.push(VectorIndexEntry::new(key.clone(), embedding)),
        }

        let evicted = match displaced {
            Some((displaced_key, _)) if displaced_key == key => None,
            Some((evicted_key, evicted)) => {
                self.vectors.retain(|indexed| indexed.key() != &evicted_key);
                debug!(key = %evicted_key.short(), "Evicted least recently used entry");
                Some(evicted)
            }
            None => None,
        };

        debug_assert!(self.is_consistent());
        evicted
    }

    /// Remove every entry older than `ttl` at `now`, with its vector.
    ///
    /// Recency order of the surviving entries is left unchanged.
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: TimeDelta) -> Vec<CacheEntry> {
        let expired_keys: Vec<Fingerprint> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        if expired_keys.is_empty() {
            return Vec::new();
        }

        let expired: Vec<CacheEntry> = expired_keys
            .iter()
            .filter_map(|key| self.entries.pop(key))
            .collect();

        let removed: HashSet<&Fingerprint> = expired_keys.iter().collect();
        self.vectors.retain(|indexed| !removed.contains(indexed.key()));

        debug!(count = expired.len(), "Expired cache entries");
        debug_assert!(self.is_consistent());
        expired
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains(key)
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.similarity_threshold
    }

    /// Keys from least to most recently used
    pub fn keys_by_recency(&self) -> Vec<Fingerprint> {
        self.entries.iter().rev().map(|(key, _)| key.clone()).collect()
    }

    /// Whether the vector index and the entry map hold the same key set
    pub fn is_consistent(&self) -> bool {
        self.vectors.len() == self.entries.len()
            && self
                .vectors
                .iter()
                .all(|indexed| self.entries.contains(indexed.key()))
    }
}
