// src/resilience/breaker.rs

//! Circuit breaker: fail fast instead of hammering a failing host.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::errors::{BeamlineError, Result};
use crate::exec::Executor;
use crate::types::{BoxFuture, CommandOutput};

/// Observable state of a [`CircuitBreaker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation; failures are being counted.
    Closed,
    /// Failing fast; calls are rejected without invoking the operation.
    Open,
    /// The recovery timeout has elapsed; a single trial call is permitted.
    HalfOpen,
}

#[derive(Debug)]
struct BreakerInner {
    open: bool,
    failures: u32,
    last_failure: Option<Instant>,
}

/// Counts consecutive failures and opens after `failure_threshold`; once
/// `recovery_timeout` has elapsed the observed state becomes `HalfOpen`
/// (without mutating stored state), letting one trial call through. A
/// successful call resets the breaker; a failed trial re-opens it with a
/// fresh failure time.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    recovery_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            inner: Mutex::new(BreakerInner {
                open: false,
                failures: 0,
                last_failure: None,
            }),
        }
    }

    /// Current state, computing the `Open` → `HalfOpen` transition from
    /// elapsed time on every query.
    pub fn state(&self) -> CircuitState {
        let inner = self.lock();
        if !inner.open {
            return CircuitState::Closed;
        }
        match inner.last_failure {
            Some(at) if at.elapsed() > self.recovery_timeout => CircuitState::HalfOpen,
            _ => CircuitState::Open,
        }
    }

    /// Record a successful call: back to `Closed`, counter zeroed.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        if inner.open {
            info!("circuit breaker reset to closed");
        }
        inner.open = false;
        inner.failures = 0;
    }

    /// Record a failed call; opens the circuit when the threshold is
    /// reached. The failure counter is not cleared on the half-open
    /// transition, so a failed trial call re-opens immediately with a fresh
    /// failure time.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.failures += 1;
        if inner.failures >= self.failure_threshold {
            if !inner.open {
                warn!(
                    failures = inner.failures,
                    threshold = self.failure_threshold,
                    "circuit breaker opened"
                );
            }
            inner.open = true;
            inner.last_failure = Some(Instant::now());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        self.inner.lock().expect("circuit breaker lock poisoned")
    }
}

/// Executor decorator guarded by a [`CircuitBreaker`].
///
/// While the circuit is open, calls fail immediately with
/// [`BeamlineError::CircuitOpen`], signalling that the breaker rather than
/// the operation rejected the call; the wrapped executor is never invoked.
#[derive(Debug)]
pub struct CircuitBreakerExecutor<E> {
    inner: E,
    breaker: CircuitBreaker,
}

impl<E> CircuitBreakerExecutor<E> {
    pub fn new(inner: E, breaker: CircuitBreaker) -> Self {
        Self { inner, breaker }
    }

    pub fn state(&self) -> CircuitState {
        self.breaker.state()
    }
}

impl<E: Executor> Executor for CircuitBreakerExecutor<E> {
    fn execute<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            if self.breaker.state() == CircuitState::Open {
                return Err(BeamlineError::CircuitOpen);
            }

            match self.inner.execute(command).await {
                Ok(output) => {
                    self.breaker.record_success();
                    Ok(output)
                }
                Err(err) => {
                    self.breaker.record_failure();
                    Err(err)
                }
            }
        })
    }
}
