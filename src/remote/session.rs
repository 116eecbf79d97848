// src/remote/session.rs

//! Session abstraction the connection pool is built against.
//!
//! Production code uses [`crate::remote::ssh`]; tests provide their own
//! implementations that don't open real connections.

use crate::errors::Result;
use crate::types::{BoxFuture, CommandOutput};

/// One live session against the remote host.
///
/// Methods return boxed futures so the trait stays dyn-compatible; the pool
/// stores sessions as `Box<dyn RemoteSession>`.
pub trait RemoteSession: Send + std::fmt::Debug {
    /// Run a shell command on the remote host and capture its output.
    fn exec<'a>(&'a mut self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>>;

    /// Whether the underlying transport is still usable. The pool checks
    /// this on release to decide between reuse and replacement.
    fn is_active(&self) -> BoxFuture<'_, bool>;

    /// Tear the session down. Best effort; errors are not reported.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// Opens new [`RemoteSession`]s; the pool calls this eagerly at construction
/// and again when replacing dead sessions.
pub trait SessionFactory: Send + Sync {
    fn connect(&self) -> BoxFuture<'_, Result<Box<dyn RemoteSession>>>;
}
