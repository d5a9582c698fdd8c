//! Retry manager for handling transient failures with exponential backoff
//!
//! Each call to [`RetryManager::execute`] runs its own attempt loop with a
//! local failure counter, so concurrent operations sharing a manager never
//! affect each other's retry budget.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backoff::BackoffPolicy;
use crate::error::RetryableError;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the delay, then issue the request again
    RetryAfter(Duration),
    /// Stop and surface the error
    Propagate,
}

/// Retry manager driven by a [`BackoffPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryManager {
    policy: BackoffPolicy,
}

impl RetryManager {
    /// Create a new RetryManager with the given policy
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    /// Create a RetryManager with the default policy
    pub fn with_defaults() -> Self {
        Self::new(BackoffPolicy::with_defaults())
    }

    /// Decide how to continue after `failures` consecutive failed attempts
    ///
    /// Terminal errors propagate immediately. Transient errors are retried
    /// until the policy's retry budget is spent.
    pub fn decide<E: RetryableError>(&self, err: &E, failures: u32) -> RetryDecision {
        if !err.is_retryable() {
            return RetryDecision::Propagate;
        }

        match self.policy.delay_for(failures) {
            Some(delay) => RetryDecision::RetryAfter(delay),
            None => RetryDecision::Propagate,
        }
    }

    /// Execute an async operation with retry logic
    ///
    /// The operation is attempted once and then retried up to `max_retries`
    /// times while it fails with a retryable error. The last error is returned
    /// once retries are exhausted.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + std::fmt::Display,
    {
        let mut failures = 0u32;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    failures = failures.saturating_add(1);

                    match self.decide(&err, failures) {
                        RetryDecision::RetryAfter(delay) => {
                            debug!(
                                attempt = failures,
                                max_retries = self.policy.max_retries(),
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "Retrying after transient error"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        RetryDecision::Propagate => {
                            if err.is_retryable() {
                                warn!(
                                    attempts = failures,
                                    max_retries = self.policy.max_retries(),
                                    error = %err,
                                    "Max retries exhausted"
                                );
                            }
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    /// Get the backoff policy
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }
}
