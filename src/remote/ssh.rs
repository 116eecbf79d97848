// src/remote/ssh.rs

//! SSH sessions backed by the OpenSSH client.
//!
//! Each pooled session is one ControlMaster connection: `connect` starts a
//! master (`ssh -M -N -f`) bound to a private control socket, `exec`
//! multiplexes commands over that socket, `is_active` asks the master with
//! `ssh -O check`, and `close` stops it with `ssh -O exit`. The client is
//! invoked with `-4` (IPv4 only) and a bounded `ConnectTimeout` so a
//! misconfigured host fails fast instead of hanging.
//!
//! Authentication is a pass-through of the configured key file (plus
//! whatever identities the ambient agent offers); `BatchMode=yes` rules out
//! interactive prompts.

use std::fs;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SshSection;
use crate::errors::{BeamlineError, Result};
use crate::remote::session::{RemoteSession, SessionFactory};
use crate::types::{BoxFuture, CommandOutput};

/// Opens [`SshMasterSession`]s for the configured host.
#[derive(Debug)]
pub struct SshMasterFactory {
    ssh: SshSection,
    control_dir: PathBuf,
}

impl SshMasterFactory {
    /// Prepare a factory; creates the directory that holds the control
    /// sockets.
    pub fn new(ssh: SshSection) -> Result<Self> {
        let control_dir = std::env::temp_dir().join("beamline-ssh");
        fs::create_dir_all(&control_dir)?;
        Ok(Self { ssh, control_dir })
    }
}

impl SessionFactory for SshMasterFactory {
    fn connect(&self) -> BoxFuture<'_, Result<Box<dyn RemoteSession>>> {
        // Short socket names: unix socket paths have a tight length limit.
        let control_path = self
            .control_dir
            .join(format!("cm-{}", Uuid::new_v4().simple()));
        let session = SshMasterSession {
            ssh: self.ssh.clone(),
            control_path,
        };

        Box::pin(async move {
            session.open_master().await?;
            debug!(
                host = %session.ssh.host,
                control = %session.control_path.display(),
                "ssh master session established"
            );
            Ok(Box::new(session) as Box<dyn RemoteSession>)
        })
    }
}

/// One ControlMaster connection to the remote host.
#[derive(Debug)]
pub struct SshMasterSession {
    ssh: SshSection,
    control_path: PathBuf,
}

impl SshMasterSession {
    /// Base `ssh` invocation sharing this session's control socket.
    fn ssh_command(&self) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-4")
            .arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg(format!("ConnectTimeout={}", self.ssh.connect_timeout_secs))
            .arg("-S")
            .arg(&self.control_path)
            .arg("-p")
            .arg(self.ssh.port.to_string());
        if let Some(key_file) = &self.ssh.key_file {
            cmd.arg("-i").arg(key_file);
        }
        cmd.arg(format!("{}@{}", self.ssh.username, self.ssh.host));
        cmd
    }

    async fn open_master(&self) -> Result<()> {
        let mut cmd = self.ssh_command();
        // -f backgrounds the master once authentication succeeded, so a
        // successful exit means the connection is live.
        cmd.arg("-M").arg("-N").arg("-f");

        let output = cmd
            .output()
            .await
            .map_err(|e| BeamlineError::Connection(format!("spawning ssh: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BeamlineError::Connection(format!(
                "Failed to establish SSH connection to {}@{}:{}: {}",
                self.ssh.username,
                self.ssh.host,
                self.ssh.port,
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn control_op(&self, op: &str) -> Result<CommandOutput> {
        let mut cmd = self.ssh_command();
        cmd.arg("-O").arg(op);
        run_to_output(cmd).await
    }
}

impl RemoteSession for SshMasterSession {
    fn exec<'a>(&'a mut self, command: &'a str) -> BoxFuture<'a, Result<CommandOutput>> {
        let mut cmd = self.ssh_command();
        cmd.arg(command);
        Box::pin(async move { run_to_output(cmd).await })
    }

    fn is_active(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            match self.control_op("check").await {
                Ok(output) => output.success(),
                Err(_) => false,
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Err(err) = self.control_op("exit").await {
                warn!(
                    control = %self.control_path.display(),
                    error = %err,
                    "failed to stop ssh master cleanly"
                );
            }
        })
    }
}

async fn run_to_output(mut cmd: Command) -> Result<CommandOutput> {
    let output = cmd
        .output()
        .await
        .map_err(|e| BeamlineError::Connection(format!("running ssh: {e}")))?;

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
