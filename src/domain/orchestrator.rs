// src/domain/orchestrator.rs

//! Top-level workflow cycle.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::models::CaseStatus;
use crate::domain::scheduler::TaskScheduler;
use crate::errors::Result;
use crate::services::CaseService;

/// Runs one discovery-and-scheduling cycle per tick.
///
/// A failing cycle is logged and dropped rather than propagated: the next
/// tick starts from persisted state, so one bad scan must not take the
/// daemon down.
#[derive(Debug)]
pub struct WorkflowOrchestrator {
    case_service: Arc<CaseService>,
    scheduler: Arc<TaskScheduler>,
}

impl WorkflowOrchestrator {
    pub fn new(case_service: Arc<CaseService>, scheduler: Arc<TaskScheduler>) -> Self {
        Self {
            case_service,
            scheduler,
        }
    }

    /// Discover new cases and schedule each one. Never fails; errors are
    /// logged and the cycle ends.
    pub fn process_new_cases(&self) {
        info!("processing cycle started");
        if let Err(err) = self.try_process() {
            error!(error = %err, "processing cycle failed");
        }
    }

    fn try_process(&self) -> Result<()> {
        let new_cases = self.case_service.scan_for_new_cases()?;
        if new_cases.is_empty() {
            info!("no new cases found");
            return Ok(());
        }

        info!(count = new_cases.len(), "found new cases");
        for case_id in new_cases {
            self.scheduler.schedule_case(&case_id)?;
            self.case_service
                .update_case_status(&case_id, CaseStatus::Queued)?;
        }
        Ok(())
    }
}
