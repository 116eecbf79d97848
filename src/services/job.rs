// src/services/job.rs

//! Job lifecycle: creation, resource allocation, completion.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::models::{Job, JobStatus};
use crate::domain::repositories::JobRepository;
use crate::errors::Result;
use crate::resources::GpuPool;

/// Creates jobs for cases and manages their GPU allocations.
pub struct JobService {
    repo: Arc<dyn JobRepository>,
    gpus: Arc<GpuPool>,
}

impl std::fmt::Debug for JobService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobService")
            .field("gpus", &self.gpus)
            .finish_non_exhaustive()
    }
}

impl JobService {
    pub fn new(repo: Arc<dyn JobRepository>, gpus: Arc<GpuPool>) -> Self {
        Self { repo, gpus }
    }

    /// Create and persist a fresh `Pending` job for `case_id`.
    pub fn create_job(&self, case_id: &str) -> Result<Job> {
        let job = Job::new(Uuid::new_v4().to_string(), case_id);
        self.repo.add(&job)?;
        info!(job_id = %job.job_id, case_id, "created job");
        Ok(job)
    }

    pub fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        self.repo.get(job_id)
    }

    /// Try to allocate `gpus_required` GPUs for `job`.
    ///
    /// On success the job transitions to `Running` with its allocation and
    /// start time recorded, and the updated record is persisted; `true` is
    /// returned. If the pool cannot satisfy the request the job is left
    /// untouched and `false` is returned; the caller retries on a later
    /// cycle.
    pub fn allocate_resources_for_job(&self, job: &mut Job, gpus_required: usize) -> Result<bool> {
        let Some(allocation) = self.gpus.allocate(gpus_required) else {
            debug!(
                job_id = %job.job_id,
                gpus_required,
                "gpu allocation deferred; pool exhausted"
            );
            return Ok(false);
        };

        job.gpu_allocation = allocation;
        job.status = JobStatus::Running;
        job.started_at = Some(Utc::now());
        self.repo.update(job)?;
        info!(job_id = %job.job_id, gpus = ?job.gpu_allocation, "job running");
        Ok(true)
    }

    /// Mark a job completed, releasing its GPUs back to the pool.
    ///
    /// The persisted record ends with an empty allocation, `Completed`
    /// status and a completion time. Unknown job ids are ignored.
    pub fn complete_job(&self, job_id: &str) -> Result<()> {
        let Some(mut job) = self.repo.get(job_id)? else {
            debug!(job_id, "completion of unknown job ignored");
            return Ok(());
        };

        self.gpus.release(&job.gpu_allocation);
        job.gpu_allocation.clear();
        job.status = JobStatus::Completed;
        job.completed_at = Some(Utc::now());
        self.repo.update(&job)?;
        info!(job_id, "job completed");
        Ok(())
    }
}
