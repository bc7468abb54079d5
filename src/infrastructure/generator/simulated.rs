//! Simulated upstream generator

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::generator::AnswerGenerator;
use crate::domain::DomainError;

/// Configuration for the simulated upstream
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Artificial latency of every generation in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 {
    800
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

impl GeneratorConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Stand-in for a slow model: waits a fixed latency, then echoes the query
#[derive(Debug, Clone)]
pub struct SimulatedGenerator {
    latency: Duration,
}

impl SimulatedGenerator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.latency())
    }
}

#[async_trait]
impl AnswerGenerator for SimulatedGenerator {
    async fn generate(&self, query: &str) -> Result<String, DomainError> {
        debug!(latency_ms = self.latency.as_millis() as u64, "Simulating upstream generation");

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(format!("Answer to: {}", query))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.latency(), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_generate_echoes_query() {
        let generator = SimulatedGenerator::new(Duration::ZERO);

        assert_eq!(generator.generate("hello").await.unwrap(), "Answer to: hello");
        assert_eq!(generator.name(), "simulated");
    }

    #[tokio::test]
    async fn test_generate_waits_for_latency() {
        let generator = SimulatedGenerator::from_config(&GeneratorConfig { latency_ms: 40 });
        let started = std::time::Instant::now();

        tokio_test::assert_ok!(generator.generate("hello").await);

        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
