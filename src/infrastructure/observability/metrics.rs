//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::LookupOutcome;

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("numeric id pattern is valid"));

const MAX_PATH_LABEL_LEN: usize = 50;

static CACHE_METRICS: OnceCell<CacheMetricNames> = OnceCell::new();

/// Cache metric names, fixed when the recorder is installed
#[derive(Debug)]
struct CacheMetricNames {
    info: String,
    requests: String,
    evictions: String,
    upstream_duration: String,
    upstream_errors: String,
    /// `None` when the entries gauge is switched off
    entries: Option<String>,
}

impl CacheMetricNames {
    fn from_config(config: &MetricsConfig) -> Self {
        Self {
            info: config.metric_name("info"),
            requests: config.metric_name("requests_total"),
            evictions: config.metric_name("evictions_total"),
            upstream_duration: config.metric_name("upstream_duration_seconds"),
            upstream_errors: config.metric_name("upstream_errors_total"),
            entries: config
                .entries_gauge
                .then(|| config.metric_name("entries")),
        }
    }
}

fn cache_metrics() -> &'static CacheMetricNames {
    CACHE_METRICS.get_or_init(|| CacheMetricNames::from_config(&MetricsConfig::default()))
}

/// Why an entry left the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    Lru,
    Ttl,
}

impl EvictionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Ttl => "ttl",
        }
    }
}

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the Prometheus recorder and fix cache metric names from `config`
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    if CACHE_METRICS
        .set(CacheMetricNames::from_config(config))
        .is_err()
    {
        tracing::warn!("Cache metric names were already fixed, keeping the earlier namespace");
    }
    let names = cache_metrics();

    let builder = match PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(names.upstream_duration.clone()),
        &config.upstream_buckets,
    ) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!("Invalid upstream duration buckets: {}", e);
            return None;
        }
    };

    match builder.install_recorder() {
        Ok(handle) => {
            gauge!(names.info.clone(), "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!(
                path = %config.path,
                namespace = %config.namespace,
                "Prometheus metrics initialized"
            );

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record how a query was resolved
pub fn record_lookup(outcome: LookupOutcome) {
    counter!(cache_metrics().requests.clone(), "outcome" => outcome.as_str()).increment(1);
}

/// Record entries removed from the cache
pub fn record_evictions(reason: EvictionReason, count: usize) {
    if count == 0 {
        return;
    }

    counter!(cache_metrics().evictions.clone(), "reason" => reason.as_str())
        .increment(count as u64);
}

/// Record one upstream generation
pub fn record_upstream_call(generator: &'static str, duration: Duration, success: bool) {
    let names = cache_metrics();

    histogram!(names.upstream_duration.clone(), "generator" => generator)
        .record(duration.as_secs_f64());

    if !success {
        counter!(names.upstream_errors.clone(), "generator" => generator).increment(1);
    }
}

/// Track the current number of cached entries
pub fn set_cache_entries(entries: usize) {
    if let Some(name) = &cache_metrics().entries {
        gauge!(name.clone()).set(entries as f64);
    }
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(MAX_PATH_LABEL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/v1/query/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/v1/query/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/v1/entries/123/answer"), "/v1/entries/{id}/answer");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/v1/analytics"), "/v1/analytics");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert_eq!(sanitize_path(path).chars().count(), MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_sanitize_path_multibyte() {
        let path = format!("/{}", "é".repeat(80));
        assert_eq!(sanitize_path(&path).chars().count(), MAX_PATH_LABEL_LEN);
    }

    #[test]
    fn test_eviction_reason_labels() {
        assert_eq!(EvictionReason::Lru.as_str(), "lru");
        assert_eq!(EvictionReason::Ttl.as_str(), "ttl");
    }

    #[test]
    fn test_metric_names_follow_namespace() {
        let config = MetricsConfig {
            namespace: "faq_cache".to_string(),
            ..MetricsConfig::default()
        };
        let names = CacheMetricNames::from_config(&config);

        assert_eq!(names.requests, "faq_cache_requests_total");
        assert_eq!(names.evictions, "faq_cache_evictions_total");
        assert_eq!(names.upstream_duration, "faq_cache_upstream_duration_seconds");
        assert_eq!(names.entries.as_deref(), Some("faq_cache_entries"));
    }

    #[test]
    fn test_entries_gauge_can_be_disabled() {
        let config = MetricsConfig {
            entries_gauge: false,
            ..MetricsConfig::default()
        };

        assert!(CacheMetricNames::from_config(&config).entries.is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_lookup(LookupOutcome::Miss);
        record_evictions(EvictionReason::Ttl, 3);
        record_upstream_call("simulated", Duration::from_millis(5), false);
        set_cache_entries(1);
    }
}
