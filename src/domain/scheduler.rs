// src/domain/scheduler.rs

//! Expansion of cases into jobs and pipeline task queues.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::domain::models::{Task, TaskType};
use crate::errors::Result;
use crate::services::{CaseService, JobService};

/// Turns a registered case into a job plus the fixed five-stage task
/// pipeline, and hands tasks out in FIFO order.
///
/// The queue lives in memory only; tasks are rebuilt from persisted cases
/// and jobs after a restart rather than persisted themselves.
pub struct TaskScheduler {
    case_service: Arc<CaseService>,
    job_service: Arc<JobService>,
    queue: Mutex<VecDeque<Task>>,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("queue_len", &self.queue_len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    pub fn new(case_service: Arc<CaseService>, job_service: Arc<JobService>) -> Self {
        Self {
            case_service,
            job_service,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a job for `case_id` and enqueue its pipeline tasks in stage
    /// order.
    ///
    /// An unknown case id is silently skipped: discovery may have raced a
    /// stale scheduling request and there is nothing to do for it.
    pub fn schedule_case(&self, case_id: &str) -> Result<()> {
        if self.case_service.get_case(case_id)?.is_none() {
            debug!(case_id, "schedule request for unknown case skipped");
            return Ok(());
        }

        let job = self.job_service.create_job(case_id)?;

        let mut queue = self.lock();
        for task_type in TaskType::PIPELINE {
            queue.push_back(Task::for_stage(&job.job_id, task_type));
        }
        info!(
            case_id,
            job_id = %job.job_id,
            tasks = TaskType::PIPELINE.len(),
            "case scheduled"
        );
        Ok(())
    }

    /// Pop the oldest queued task, if any.
    pub fn get_next_task(&self) -> Option<Task> {
        self.lock().pop_front()
    }

    /// Acknowledge a finished task.
    ///
    /// Tasks are removed from the queue when handed out, so there is nothing
    /// to mutate here; the hook exists for workers to report through.
    pub fn complete_task(&self, task_id: &str) {
        debug!(task_id, "task completed");
    }

    pub fn queue_len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Task>> {
        self.queue.lock().expect("task queue lock poisoned")
    }
}
