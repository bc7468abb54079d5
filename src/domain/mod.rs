//! Domain layer - Core business logic and entities

pub mod analytics;
pub mod cache;
pub mod embedding;
pub mod error;
pub mod generator;

pub use analytics::{AnalyticsCounters, AnalyticsSnapshot, CostModel, LookupOutcome};
pub use cache::{
    CacheConfig, CacheEntry, CacheStore, Clock, Fingerprint, ManualClock, SemanticMatch,
    SystemClock,
};
pub use embedding::{CharSumEmbedder, Embedder};
pub use error::DomainError;
pub use generator::AnswerGenerator;
