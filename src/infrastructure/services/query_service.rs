//! Query answering service
//!
//! Serves answers from the response cache when an exact or semantically
//! similar query has been answered before, and falls back to the upstream
//! generator otherwise.
//!
//! The store and analytics counters live behind one mutex. Each request takes
//! it twice at most: once for expire, probe, touch and outcome recording, and
//! once more after a miss to insert the generated answer. The upstream call
//! runs with the lock released, so concurrent misses on the same query may
//! each reach the generator; the last insert wins and the store stays
//! consistent.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::analytics::{AnalyticsCounters, AnalyticsSnapshot, CostModel, LookupOutcome};
use crate::domain::cache::{normalize_query, CacheConfig, CacheStore, Clock, Fingerprint, SystemClock};
use crate::domain::embedding::{CharSumEmbedder, Embedder};
use crate::domain::generator::AnswerGenerator;
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_evictions, record_lookup, record_upstream_call, set_cache_entries, EvictionReason,
};

/// Result of answering one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub answer: String,
    pub was_cached: bool,
    /// Key of the entry that served the answer, or of the entry just created
    pub cache_key: Fingerprint,
    /// Wall-clock time from call start to return, upstream call included
    pub latency_ms: u64,
    pub outcome: LookupOutcome,
}

#[derive(Debug)]
struct CacheState {
    store: CacheStore,
    counters: AnalyticsCounters,
}

enum Lookup {
    Hit {
        key: Fingerprint,
        answer: String,
        outcome: LookupOutcome,
    },
    Miss {
        embedding: Vec<f32>,
    },
}

/// Response cache in front of an upstream answer generator
#[derive(Debug)]
pub struct QueryService {
    state: Mutex<CacheState>,
    generator: Arc<dyn AnswerGenerator>,
    embedder: Arc<dyn Embedder>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    cost_model: CostModel,
}

/// Builder for [`QueryService`]
#[derive(Debug)]
pub struct QueryServiceBuilder {
    generator: Arc<dyn AnswerGenerator>,
    config: CacheConfig,
    cost_model: CostModel,
    embedder: Option<Arc<dyn Embedder>>,
    clock: Option<Arc<dyn Clock>>,
}

impl QueryServiceBuilder {
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Replace the default character-sum embedder
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<QueryService, DomainError> {
        self.cost_model.validate()?;
        let store = CacheStore::from_config(&self.config)?;

        let embedder: Arc<dyn Embedder> = match self.embedder {
            Some(embedder) => embedder,
            None => Arc::new(CharSumEmbedder::new(self.config.embedding_dimensions)),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        if embedder.dimensions() != self.config.embedding_dimensions {
            return Err(DomainError::configuration(format!(
                "Embedder '{}' produces {} dimensions, cache is configured for {}",
                embedder.name(),
                embedder.dimensions(),
                self.config.embedding_dimensions
            )));
        }

        Ok(QueryService {
            state: Mutex::new(CacheState {
                store,
                counters: AnalyticsCounters::new(),
            }),
            generator: self.generator,
            embedder,
            clock,
            config: self.config,
            cost_model: self.cost_model,
        })
    }
}

impl QueryService {
    pub fn builder(generator: Arc<dyn AnswerGenerator>) -> QueryServiceBuilder {
        QueryServiceBuilder {
            generator,
            config: CacheConfig::default(),
            cost_model: CostModel::default(),
            embedder: None,
            clock: None,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Answer a query from cache, or from the upstream generator on a miss.
    ///
    /// Upstream failures are returned unchanged and leave the cache untouched;
    /// the request still counts as a miss.
    pub async fn answer(&self, query: &str) -> Result<QueryAnswer, DomainError> {
        let started = Instant::now();
        let normalized = normalize_query(query);
        let key = Fingerprint::from_normalized(normalized);

        let embedding = match self.lookup(&key, normalized)? {
            Lookup::Hit {
                key,
                answer,
                outcome,
            } => {
                record_lookup(outcome);

                return Ok(QueryAnswer {
                    answer,
                    was_cached: true,
                    cache_key: key,
                    latency_ms: elapsed_ms(started),
                    outcome,
                });
            }
            Lookup::Miss { embedding } => embedding,
        };

        record_lookup(LookupOutcome::Miss);
        debug!(key = %key.short(), generator = self.generator.name(), "Cache miss");

        let upstream_started = Instant::now();
        let generated = self.generator.generate(normalized).await;
        record_upstream_call(
            self.generator.name(),
            upstream_started.elapsed(),
            generated.is_ok(),
        );

        let answer = generated.inspect_err(|e| {
            warn!(key = %key.short(), error = %e, "Upstream generation failed");
        })?;

        self.store_answer(key.clone(), &answer, embedding)?;

        Ok(QueryAnswer {
            answer,
            was_cached: false,
            cache_key: key,
            latency_ms: elapsed_ms(started),
            outcome: LookupOutcome::Miss,
        })
    }

    /// Current analytics, read under the cache lock
    pub fn analytics(&self) -> Result<AnalyticsSnapshot, DomainError> {
        let state = self.lock_state()?;

        Ok(AnalyticsSnapshot::compute(
            &state.counters,
            state.store.len(),
            &self.cost_model,
        ))
    }

    /// Number of entries currently cached
    pub fn cache_size(&self) -> Result<usize, DomainError> {
        Ok(self.lock_state()?.store.len())
    }

    fn lookup(&self, key: &Fingerprint, normalized: &str) -> Result<Lookup, DomainError> {
        let now = self.clock.now();
        let mut guard = self.lock_state()?;
        let state = &mut *guard;

        let expired = state.store.expire(now, self.config.ttl());
        if !expired.is_empty() {
            record_evictions(EvictionReason::Ttl, expired.len());
            set_cache_entries(state.store.len());
        }

        let exact = state
            .store
            .probe_exact(key)
            .map(|entry| entry.answer().to_string());

        if let Some(answer) = exact {
            state.store.touch(key);
            state.counters.record(LookupOutcome::ExactHit);
            debug!(key = %key.short(), "Exact cache hit");

            return Ok(Lookup::Hit {
                key: key.clone(),
                answer,
                outcome: LookupOutcome::ExactHit,
            });
        }

        let embedding = self.embedder.embed(normalized);

        if let Some(found) = state.store.probe_approximate(&embedding) {
            let answer = state
                .store
                .probe_exact(&found.key)
                .map(|entry| entry.answer().to_string())
                .ok_or_else(|| {
                    DomainError::internal("Vector index references a missing cache entry")
                })?;

            state.store.touch(&found.key);
            state.counters.record(LookupOutcome::SemanticHit);
            debug!(
                key = %found.key.short(),
                similarity = found.similarity,
                "Semantic cache hit"
            );

            return Ok(Lookup::Hit {
                key: found.key,
                answer,
                outcome: LookupOutcome::SemanticHit,
            });
        }

        state.counters.record(LookupOutcome::Miss);
        Ok(Lookup::Miss { embedding })
    }

    fn store_answer(
        &self,
        key: Fingerprint,
        answer: &str,
        embedding: Vec<f32>,
    ) -> Result<(), DomainError> {
        let now = self.clock.now();
        let mut state = self.lock_state()?;

        if state.store.insert(key, answer, embedding, now).is_some() {
            record_evictions(EvictionReason::Lru, 1);
        }

        set_cache_entries(state.store.len());
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, CacheState>, DomainError> {
        self.state
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire cache lock: {}", e)))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Trait for query service operations
#[async_trait::async_trait]
pub trait QueryServiceTrait: Send + Sync + std::fmt::Debug {
    /// Answer a query from cache or upstream
    async fn answer(&self, query: &str) -> Result<QueryAnswer, DomainError>;

    /// Get cache analytics
    fn analytics(&self) -> Result<AnalyticsSnapshot, DomainError>;

    /// Get the number of cached entries
    fn cache_size(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl QueryServiceTrait for QueryService {
    async fn answer(&self, query: &str) -> Result<QueryAnswer, DomainError> {
        QueryService::answer(self, query).await
    }

    fn analytics(&self) -> Result<AnalyticsSnapshot, DomainError> {
        QueryService::analytics(self)
    }

    fn cache_size(&self) -> Result<usize, DomainError> {
        QueryService::cache_size(self)
    }
}
