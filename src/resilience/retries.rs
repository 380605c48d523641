//! Retry logic.
//!
//! # State Machine
//! ```text
//! Attempting → Success: done
//! Attempting → Failure: Evaluate
//! Evaluate → retryable && attempt < max: Wait → Attempting
//! Evaluate → otherwise: Failed (last error returned)
//! ```
//!
//! # Design Decisions
//! - `max_retries` counts total attempts, first one included
//! - A server-declared retry-after wins over computed backoff
//! - Every wait is capped at `max_retry_delay`, so an exhausted sequence is
//!   bounded by `max_retries × max_retry_delay` plus call latency

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::error::OperationError;
use crate::observability::metrics;
use crate::resilience::backoff::{apply_jitter, calculate_backoff};

/// What the retry loop needs to know about a failure.
pub trait RetryableError: fmt::Display {
    fn status(&self) -> u16;

    /// Server-directed wait, if the failure carried one.
    fn retry_after(&self) -> Option<Duration>;
}

impl RetryableError for OperationError {
    fn status(&self) -> u16 {
        OperationError::status(self)
    }

    fn retry_after(&self) -> Option<Duration> {
        OperationError::retry_after(self)
    }
}

/// 429 or any 5xx.
pub fn default_should_retry(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

type StatusPredicate = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Bounded-attempt retry executor. Immutable after construction.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_retry_delay: Duration,
    jitter: bool,
    should_retry: StatusPredicate,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_retry_delay: Duration::from_millis(config.max_retry_delay_ms),
            jitter: config.jitter,
            should_retry: Arc::new(default_should_retry),
        }
    }

    /// Replace the status predicate deciding which failures are retried.
    pub fn with_should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(predicate);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn should_retry(&self, status: u16) -> bool {
        (self.should_retry)(status)
    }

    /// Wait after the `attempt`-th failure (1-based).
    pub fn delay_for<E: RetryableError>(&self, attempt: u32, error: &E) -> Duration {
        if let Some(server_delay) = error.retry_after() {
            return server_delay.min(self.max_retry_delay);
        }

        let computed = calculate_backoff(
            attempt,
            self.base_delay.as_millis() as u64,
            self.max_retry_delay.as_millis() as u64,
        );
        if self.jitter {
            apply_jitter(computed, self.max_retry_delay)
        } else {
            computed
        }
    }

    /// Run `operation` until it succeeds, fails terminally, or attempts run out.
    ///
    /// On exhaustion the last error is returned unchanged.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        E: RetryableError,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempts = attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let status = error.status();
                    if !self.should_retry(status) {
                        tracing::debug!(status, error = %error, "Non-retryable failure");
                        return Err(error);
                    }
                    if attempt >= self.max_retries {
                        tracing::warn!(
                            attempts = attempt,
                            status,
                            error = %error,
                            "Retry attempts exhausted"
                        );
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt, &error);
                    tracing::warn!(
                        attempt,
                        status,
                        delay_ms = delay.as_millis() as u64,
                        server_directed = error.retry_after().is_some(),
                        "Retrying after failure"
                    );
                    metrics::record_retry(status);
                    sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_retry_delay", &self.max_retry_delay)
            .field("jitter", &self.jitter)
            .finish()
    }
}
