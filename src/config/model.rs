// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::resilience::RetryPolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [app]
/// state_file = "var/state.json"
/// scan_interval_secs = 60
///
/// [ssh]
/// host = "gpu-cluster.internal"
/// port = 22
/// username = "beamline"
/// key_file = "/home/beamline/.ssh/id_ed25519"
/// pool_size = 5
///
/// [resources]
/// gpu_count = 8
///
/// [paths]
/// local_data = "/data/cases"
/// remote_workspace = "/workspace/cases"
/// ```
///
/// `[retry]` and `[circuit_breaker]` are optional and default to the policy
/// applied to every remote command.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub app: AppSection,
    pub ssh: SshSection,
    pub resources: ResourcesSection,
    pub paths: PathsSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerSection,
}

/// Validated configuration. Constructed via `TryFrom<RawConfigFile>`
/// (see `validate.rs`); field meaning is identical to [`RawConfigFile`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub app: AppSection,
    pub ssh: SshSection,
    pub resources: ResourcesSection,
    pub paths: PathsSection,
    pub retry: RetrySection,
    pub circuit_breaker: CircuitBreakerSection,
}

impl ConfigFile {
    /// Internal constructor used after validation has passed.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            app: raw.app,
            ssh: raw.ssh,
            resources: raw.resources,
            paths: raw.paths,
            retry: raw.retry,
            circuit_breaker: raw.circuit_breaker,
        }
    }
}

/// `[app]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// Path of the persisted JSON state file.
    pub state_file: PathBuf,

    /// Seconds between scan/schedule cycles of the polling loop.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
}

fn default_scan_interval_secs() -> u64 {
    60
}

/// `[ssh]` section: connection parameters for the remote cluster.
///
/// Credentials are passed through as-is; key-file authentication only.
#[derive(Debug, Clone, Deserialize)]
pub struct SshSection {
    pub host: String,

    #[serde(default = "default_ssh_port")]
    pub port: u16,

    pub username: String,

    /// Private key used for authentication (optional; falls back to the
    /// ambient SSH agent / default identities).
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Number of pooled sessions kept open against the cluster.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Bound on establishing a single session.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Bound on waiting for a free session from the pool.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_ssh_port() -> u16 {
    22
}

fn default_pool_size() -> usize {
    5
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl SshSection {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// `[resources]` section: the fixed GPU inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesSection {
    /// Total number of GPU identifiers (`0..gpu_count`).
    pub gpu_count: u32,

    /// GPUs requested per job.
    #[serde(default = "default_gpus_per_job")]
    pub gpus_per_job: u32,
}

fn default_gpus_per_job() -> u32 {
    1
}

/// `[paths]` section.
///
/// Kept as plain strings: they are spliced verbatim into the remote command
/// templates (`scp -r <local>/<case_id> <remote>/<case_id>` etc.).
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Local directory scanned for case directories.
    pub local_data: String,

    /// Remote workspace root that cases are uploaded into.
    pub remote_workspace: String,
}

/// `[retry]` section: backoff applied to remote commands.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_exponential_base")]
    pub exponential_base: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    1_000
}

fn default_exponential_base() -> f64 {
    2.0
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            exponential_base: default_exponential_base(),
        }
    }
}

impl RetrySection {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            exponential_base: self.exponential_base,
        }
    }
}

/// `[circuit_breaker]` section: fail-fast guard on remote commands.
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitBreakerSection {
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    #[serde(default = "default_recovery_timeout_secs")]
    pub recovery_timeout_secs: u64,
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_recovery_timeout_secs() -> u64 {
    30
}

impl Default for CircuitBreakerSection {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            recovery_timeout_secs: default_recovery_timeout_secs(),
        }
    }
}

impl CircuitBreakerSection {
    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_secs(self.recovery_timeout_secs)
    }
}
