//! Analytics domain
//!
//! Request counters kept alongside the cache store, and the derived report
//! with hit rate and estimated upstream cost savings.

mod counters;
mod snapshot;

pub use counters::{AnalyticsCounters, LookupOutcome};
pub use snapshot::{AnalyticsSnapshot, CostModel, STRATEGIES};
