// src/services/transfer.rs

//! Case data transfer between the local data path and the remote workspace.
//!
//! Transfers are expressed as shell commands handed to an [`Executor`], so
//! the same service works against a real remote host, a resilience-wrapped
//! executor, or a scripted fake in tests.

use std::sync::Arc;

use tracing::info;

use crate::errors::{BeamlineError, Result};
use crate::exec::Executor;
use crate::types::CommandOutput;

/// Moves case inputs to the remote workspace and results back.
pub struct TransferService {
    executor: Arc<dyn Executor>,
    local_data_path: String,
    remote_workspace: String,
}

impl std::fmt::Debug for TransferService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferService")
            .field("local_data_path", &self.local_data_path)
            .field("remote_workspace", &self.remote_workspace)
            .finish_non_exhaustive()
    }
}

impl TransferService {
    pub fn new(
        executor: Arc<dyn Executor>,
        local_data_path: impl Into<String>,
        remote_workspace: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            local_data_path: local_data_path.into(),
            remote_workspace: remote_workspace.into(),
        }
    }

    /// Upload a case directory into the remote workspace.
    ///
    /// The workspace directory is created first; if that fails, the copy is
    /// never attempted.
    pub async fn upload_case(&self, case_id: &str) -> Result<()> {
        let mkdir = format!("mkdir -p {}", self.remote_workspace);
        self.run_checked(case_id, &mkdir).await?;

        let copy = format!(
            "scp -r {}/{} {}/{}",
            self.local_data_path, case_id, self.remote_workspace, case_id
        );
        self.run_checked(case_id, &copy).await?;
        info!(case_id, "case uploaded");
        Ok(())
    }

    /// Download a case's results directory from the remote workspace.
    pub async fn download_results(&self, case_id: &str) -> Result<()> {
        let copy = format!(
            "scp -r {}/{}/results {}/{}/results",
            self.remote_workspace, case_id, self.local_data_path, case_id
        );
        self.run_checked(case_id, &copy).await?;
        info!(case_id, "results downloaded");
        Ok(())
    }

    async fn run_checked(&self, case_id: &str, command: &str) -> Result<CommandOutput> {
        let output = self.executor.execute(command).await?;
        if !output.success() {
            return Err(BeamlineError::Transfer(format!(
                "transfer command for case {case_id} exited with {}: {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }
        Ok(output)
    }
}
