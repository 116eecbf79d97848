// src/resilience/mod.rs

//! Resilience primitives protecting remote interactions.
//!
//! Both wrappers implement the same [`crate::exec::Executor`] trait as the
//! executor they wrap and compose by delegation. The composition root wires
//! every remote executor as breaker-around-retry
//! (`CircuitBreakerExecutor(RetryingExecutor(RemoteExecutor))`), so remote
//! commands are retried on transient connection failures and fail fast once
//! the host is persistently down.

pub mod breaker;
pub mod retry;

pub use breaker::{CircuitBreaker, CircuitBreakerExecutor, CircuitState};
pub use retry::{RetryPolicy, RetryingExecutor};
