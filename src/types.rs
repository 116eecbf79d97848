// src/types.rs

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by dyn-compatible async traits ([`crate::exec::Executor`],
/// [`crate::remote::RemoteSession`], ...).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of running a shell command, local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
