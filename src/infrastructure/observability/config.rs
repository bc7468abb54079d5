//! Observability settings for the response cache
//!
//! `tracing` controls OTLP span export. `metrics` controls the Prometheus
//! endpoint and how cache metrics are named and bucketed.

use serde::Deserialize;

use crate::domain::DomainError;

/// Metric name namespace used when none is configured
pub const DEFAULT_METRICS_NAMESPACE: &str = "response_cache";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ObservabilityConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.tracing.validate()?;
        self.metrics.validate()
    }
}

/// OTLP span export
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    /// Reported as `service.name` on exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fraction of traces kept, 0.0 to 1.0
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl TracingConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.sampling_ratio) {
            return Err(DomainError::configuration(format!(
                "observability.tracing.sampling_ratio must be within [0, 1], got {}",
                self.sampling_ratio
            )));
        }

        if self.enabled && self.otlp_endpoint.trim().is_empty() {
            return Err(DomainError::configuration(
                "observability.tracing.otlp_endpoint is required when tracing is enabled",
            ));
        }

        Ok(())
    }
}

/// Prometheus exposition of cache metrics
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Route serving the exposition text
    #[serde(default = "default_metrics_path")]
    pub path: String,
    /// Prefix of every cache metric, e.g. `{namespace}_requests_total`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Publish the `{namespace}_entries` gauge after every store change
    #[serde(default = "default_true")]
    pub entries_gauge: bool,
    /// Histogram buckets in seconds for upstream generation time
    #[serde(default = "default_upstream_buckets")]
    pub upstream_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
            namespace: default_namespace(),
            entries_gauge: true,
            upstream_buckets: default_upstream_buckets(),
        }
    }
}

impl MetricsConfig {
    /// Full name of a cache metric under the configured namespace
    pub fn metric_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.namespace, suffix)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.path.starts_with('/') {
            return Err(DomainError::configuration(format!(
                "observability.metrics.path must start with '/', got '{}'",
                self.path
            )));
        }

        if !is_valid_namespace(&self.namespace) {
            return Err(DomainError::configuration(format!(
                "observability.metrics.namespace '{}' is not a valid Prometheus name",
                self.namespace
            )));
        }

        let ascending = self.upstream_buckets.windows(2).all(|w| w[0] < w[1]);
        let positive = self
            .upstream_buckets
            .iter()
            .all(|b| b.is_finite() && *b > 0.0);

        if self.upstream_buckets.is_empty() || !ascending || !positive {
            return Err(DomainError::configuration(
                "observability.metrics.upstream_buckets must be positive and strictly ascending",
            ));
        }

        Ok(())
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_namespace() -> String {
    DEFAULT_METRICS_NAMESPACE.to_string()
}

/// Spans the simulated upstream's default latency of 0.8s
fn default_upstream_buckets() -> Vec<f64> {
    vec![0.05, 0.1, 0.25, 0.5, 0.8, 1.0, 2.5, 5.0, 10.0]
}
