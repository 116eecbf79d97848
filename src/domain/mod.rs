// src/domain/mod.rs

//! Domain core: entities, repository contracts, the task scheduler and the
//! workflow orchestrator.
//!
//! Everything here is synchronous and free of IO beyond what the injected
//! repositories/services perform, so the orchestration semantics can be
//! tested without tokio, processes, or a real filesystem.

pub mod models;
pub mod orchestrator;
pub mod repositories;
pub mod scheduler;

pub use models::{Case, CaseStatus, Job, JobStatus, Task, TaskType};
pub use orchestrator::WorkflowOrchestrator;
pub use repositories::{CaseRepository, JobRepository};
pub use scheduler::TaskScheduler;
