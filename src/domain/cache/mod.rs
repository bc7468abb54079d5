//! Cache domain - fingerprinting, entries, and the recency-ordered store

mod clock;
mod config;
mod entry;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::{CacheEntry, VectorIndexEntry};
pub use key::{normalize_query, Fingerprint};
pub use store::{CacheStore, SemanticMatch};
