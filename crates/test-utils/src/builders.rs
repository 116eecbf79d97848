#![allow(dead_code)]

use beamline::config::{
    AppSection, CircuitBreakerSection, ConfigFile, PathsSection, RawConfigFile, ResourcesSection,
    RetrySection, SshSection,
};
use beamline::domain::{Case, CaseStatus, Job, JobStatus};

/// Builder for `Case` records with sensible test defaults.
pub struct CaseBuilder {
    case: Case,
}

impl CaseBuilder {
    pub fn new(case_id: &str) -> Self {
        Self {
            case: Case::new(case_id),
        }
    }

    pub fn status(mut self, status: CaseStatus) -> Self {
        self.case.status = status;
        self
    }

    pub fn beam_count(mut self, count: u32) -> Self {
        self.case.beam_count = count;
        self
    }

    pub fn metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.case.metadata.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Case {
        self.case
    }
}

/// Builder for `Job` records.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(job_id: &str, case_id: &str) -> Self {
        Self {
            job: Job::new(job_id, case_id),
        }
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.job.status = status;
        self
    }

    pub fn gpu_allocation(mut self, gpus: &[u32]) -> Self {
        self.job.gpu_allocation = gpus.to_vec();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.job.priority = priority;
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(state_file: &str) -> Self {
        Self {
            config: RawConfigFile {
                app: AppSection {
                    state_file: state_file.into(),
                    scan_interval_secs: 60,
                },
                ssh: SshSection {
                    host: "cluster.test".to_string(),
                    port: 22,
                    username: "beamline".to_string(),
                    key_file: None,
                    pool_size: 2,
                    connect_timeout_secs: 10,
                    acquire_timeout_secs: 30,
                },
                resources: ResourcesSection {
                    gpu_count: 4,
                    gpus_per_job: 1,
                },
                paths: PathsSection {
                    local_data: "/data/cases".to_string(),
                    remote_workspace: "/workspace/cases".to_string(),
                },
                retry: RetrySection::default(),
                circuit_breaker: CircuitBreakerSection::default(),
            },
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.ssh.host = host.to_string();
        self
    }

    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.ssh.pool_size = size;
        self
    }

    pub fn gpu_count(mut self, count: u32) -> Self {
        self.config.resources.gpu_count = count;
        self
    }

    pub fn gpus_per_job(mut self, count: u32) -> Self {
        self.config.resources.gpus_per_job = count;
        self
    }

    pub fn paths(mut self, local_data: &str, remote_workspace: &str) -> Self {
        self.config.paths.local_data = local_data.to_string();
        self.config.paths.remote_workspace = remote_workspace.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
