// src/exec/mod.rs

//! Command execution layer.
//!
//! [`Executor`] is the uniform "run a shell command, get exit code + stdout
//! + stderr" contract. [`LocalExecutor`] runs on this machine via the
//! platform shell; [`RemoteExecutor`] draws a session from the connection
//! pool for the duration of each command. The resilience wrappers in
//! [`crate::resilience`] implement the same trait and compose by
//! delegation.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;
use crate::remote::ConnectionPool;
use crate::types::{BoxFuture, CommandOutput};

/// Uniform command-execution contract, local or remote.
pub trait Executor: Send + Sync {
    fn execute<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>>;
}

/// Runs commands in a local shell.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor;

impl Executor for LocalExecutor {
    fn execute<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        // Platform-appropriate shell.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        Box::pin(async move {
            debug!(command, "executing local command");
            let output = cmd.output().await?;
            Ok(CommandOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}

/// Runs commands on the remote host using pooled sessions.
///
/// Each command is executed inside a scoped acquisition, so the session
/// returns to the pool whether the command succeeds or fails.
#[derive(Debug)]
pub struct RemoteExecutor {
    pool: Arc<ConnectionPool>,
}

impl RemoteExecutor {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl Executor for RemoteExecutor {
    fn execute<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            debug!(command, "executing remote command");
            // `with_session` requires a future that borrows only the
            // session, but `exec` must also borrow `command`, which does
            // not outlive the closure bound's higher-ranked lifetime. The
            // scoped acquire/release is therefore inlined here.
            let mut session = self.pool.acquire().await?;
            let result = session.exec(command).await;
            self.pool.release(session).await;
            result
        })
    }
}
