// src/resilience/retry.rs

//! Retry with exponential backoff.

use std::time::Duration;

use tracing::{error, warn};

use crate::errors::Result;
use crate::exec::Executor;
use crate::types::{BoxFuture, CommandOutput};

/// Configuration for a retry wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Base of the exponential backoff.
    pub exponential_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            exponential_base: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff after the `attempt`-th failure (1-based):
    /// `min(max_delay, base_delay * exponential_base^(attempt - 1))`.
    ///
    /// The product is computed and clamped in f64, so an aggressive base or
    /// a large attempt count caps at `max_delay` instead of overflowing
    /// `Duration` arithmetic.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.base_delay.as_secs_f64() * self.exponential_base.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(scaled)
    }
}

/// Executor decorator that re-invokes the wrapped executor on retryable
/// failures, sleeping between attempts, and returns the final error once
/// the policy's attempts are exhausted.
///
/// The backoff sleep suspends only the calling task; it is purely a timer,
/// not a concurrency mechanism.
#[derive(Debug)]
pub struct RetryingExecutor<E> {
    inner: E,
    policy: RetryPolicy,
}

impl<E> RetryingExecutor<E> {
    pub fn new(inner: E, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<E: Executor> Executor for RetryingExecutor<E> {
    fn execute<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            let mut attempt = 0u32;
            loop {
                attempt += 1;
                let err = match self.inner.execute(command).await {
                    Ok(output) => return Ok(output),
                    Err(err) => err,
                };

                if !err.is_retryable() || attempt >= self.policy.max_attempts {
                    if err.is_retryable() {
                        error!(
                            command,
                            attempts = attempt,
                            "command failed after {} attempts; giving up",
                            self.policy.max_attempts
                        );
                    }
                    return Err(err);
                }

                let delay = self.policy.delay_for(attempt);
                warn!(
                    command,
                    attempt,
                    max_attempts = self.policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "command failed; retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        })
    }
}
