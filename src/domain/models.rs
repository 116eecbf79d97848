// src/domain/models.rs

//! Core entities: cases, jobs and pipeline tasks.
//!
//! Serialized forms are part of the persisted state-file format: status
//! enums serialize to their canonical lowercase string value and timestamps
//! to ISO-8601 UTC strings, so the serde attributes here are load-bearing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form string-keyed map carried by cases and tasks.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Lifecycle status of a [`Case`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    New,
    Queued,
    Processing,
    Completed,
    Failed,
}

/// Lifecycle status of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// One stage of the fixed processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Upload,
    Interpret,
    BeamCalc,
    Convert,
    Download,
}

impl TaskType {
    /// The fixed pipeline order every job is expanded into.
    pub const PIPELINE: [TaskType; 5] = [
        TaskType::Upload,
        TaskType::Interpret,
        TaskType::BeamCalc,
        TaskType::Convert,
        TaskType::Download,
    ];

    /// Stage name as used in derived task ids (`"<job_id>_<stage>"`).
    pub fn stage_name(&self) -> &'static str {
        match self {
            TaskType::Upload => "upload",
            TaskType::Interpret => "interpret",
            TaskType::BeamCalc => "beam_calc",
            TaskType::Convert => "convert",
            TaskType::Download => "download",
        }
    }
}

/// A unit of external work (a case directory) discovered in the local data
/// path.
///
/// Exactly one persisted record exists per `case_id`; cases are never
/// physically deleted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub case_id: String,
    pub status: CaseStatus,
    pub beam_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Case {
    /// A freshly discovered case: status `New`, timestamps set to now.
    pub fn new(case_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            case_id: case_id.into(),
            status: CaseStatus::New,
            beam_count: 0,
            created_at: now,
            updated_at: now,
            metadata: Metadata::new(),
        }
    }
}

/// One execution instance of a case's pipeline, holding its own GPU
/// allocation while running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub case_id: String,
    pub status: JobStatus,
    /// GPU ids held by this job; non-empty only while `status == Running`.
    #[serde(default)]
    pub gpu_allocation: Vec<u32>,
    /// Reserved for future scheduling decisions; currently unused.
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(job_id: impl Into<String>, case_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            case_id: case_id.into(),
            status: JobStatus::Pending,
            gpu_allocation: Vec::new(),
            priority: 1,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }
}

/// One stage of a job's pipeline.
///
/// Tasks are ephemeral: created in a batch when a case is scheduled, held in
/// the scheduler's in-process queue only, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub job_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub parameters: Metadata,
    pub status: String,
}

impl Task {
    /// Build the task for one pipeline stage of a job. The id is derived
    /// deterministically: `"<job_id>_<stage>"`.
    pub fn for_stage(job_id: &str, task_type: TaskType) -> Self {
        Self {
            task_id: format!("{}_{}", job_id, task_type.stage_name()),
            job_id: job_id.to_string(),
            task_type,
            parameters: Metadata::new(),
            status: "pending".to_string(),
        }
    }
}
