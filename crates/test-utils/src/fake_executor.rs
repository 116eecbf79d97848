use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use beamline::errors::{BeamlineError, Result};
use beamline::exec::Executor;
use beamline::types::{BoxFuture, CommandOutput};

/// A scripted response handed out by [`FakeExecutor`].
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// Succeed with the given exit code / stdout / stderr.
    Output(CommandOutput),
    /// Fail with a retryable connection error.
    ConnectionError(String),
    /// Fail with a non-retryable transfer error.
    TransferError(String),
}

/// A fake executor that:
/// - records every command it is asked to run
/// - replies with scripted responses, in order; once the script is
///   exhausted, every command succeeds with exit code 0.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    commands: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<VecDeque<FakeResponse>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scripted response for the next unscripted command.
    pub fn push_response(&self, response: FakeResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Convenience: script a success with the given output text.
    pub fn push_success(&self, stdout: &str) {
        self.push_response(FakeResponse::Output(CommandOutput {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
    }

    /// Convenience: script a non-zero exit with the given stderr text.
    pub fn push_failure(&self, exit_code: i32, stderr: &str) {
        self.push_response(FakeResponse::Output(CommandOutput {
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }));
    }

    /// Every command executed so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn command_count(&self) -> usize {
        self.commands.lock().unwrap().len()
    }
}

impl Executor for FakeExecutor {
    fn execute<'a>(&'a self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            self.commands.lock().unwrap().push(command.to_string());

            let response = self.script.lock().unwrap().pop_front();
            match response {
                None => Ok(CommandOutput {
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: String::new(),
                }),
                Some(FakeResponse::Output(output)) => Ok(output),
                Some(FakeResponse::ConnectionError(msg)) => {
                    Err(BeamlineError::Connection(msg))
                }
                Some(FakeResponse::TransferError(msg)) => Err(BeamlineError::Transfer(msg)),
            }
        })
    }
}
