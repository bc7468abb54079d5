use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Slow upstream that produces answers for queries the cache cannot serve.
///
/// Treated as opaque: output is neither validated nor retried, and failures
/// are returned to the caller as `DomainError::Upstream`.
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    async fn generate(&self, query: &str) -> Result<String, DomainError>;

    /// Get the generator name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Default)]
    pub struct MockGenerator {
        calls: AtomicUsize,
        error: Option<String>,
        delay: Option<Duration>,
    }

    impl MockGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Number of `generate` calls so far, failed ones included
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnswerGenerator for MockGenerator {
        async fn generate(&self, query: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::upstream(self.name(), error));
            }

            Ok(format!("Answer to: {}", query))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }
}
