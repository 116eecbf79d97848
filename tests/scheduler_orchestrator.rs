// tests/scheduler_orchestrator.rs

mod common;
use crate::common::{init_tracing, store_fixture, StoreFixture};

use std::path::PathBuf;
use std::sync::Arc;

use beamline::domain::{
    CaseRepository, CaseStatus, JobRepository, TaskScheduler, TaskType, WorkflowOrchestrator,
};
use beamline::fs::mock::MockFileSystem;
use beamline::resources::GpuPool;
use beamline::services::{CaseService, JobService};
use beamline::store::{StateCaseRepository, StateJobRepository};
use beamline_test_utils::builders::ConfigFileBuilder;

const SCAN_PATH: &str = "/data/cases";

struct Harness {
    fx: StoreFixture,
    fs: MockFileSystem,
    case_service: Arc<CaseService>,
    job_service: Arc<JobService>,
    scheduler: Arc<TaskScheduler>,
}

fn harness() -> Harness {
    let fx = store_fixture();
    let fs = MockFileSystem::new();

    let case_service = Arc::new(CaseService::new(
        Arc::new(StateCaseRepository::new(Arc::clone(&fx.store))),
        Arc::new(fs.clone()),
        PathBuf::from(SCAN_PATH),
    ));
    let job_service = Arc::new(JobService::new(
        Arc::new(StateJobRepository::new(Arc::clone(&fx.store))),
        Arc::new(GpuPool::new(4)),
    ));
    let scheduler = Arc::new(TaskScheduler::new(
        Arc::clone(&case_service),
        Arc::clone(&job_service),
    ));

    Harness {
        fx,
        fs,
        case_service,
        job_service,
        scheduler,
    }
}

fn job_repo(h: &Harness) -> StateJobRepository {
    StateJobRepository::new(Arc::clone(&h.fx.store))
}

#[test]
fn scheduling_enqueues_the_five_stage_pipeline_in_order() {
    init_tracing();
    let h = harness();
    h.fs.add_dir(SCAN_PATH, &["case-a"]);
    h.case_service.scan_for_new_cases().unwrap();

    h.scheduler.schedule_case("case-a").expect("schedule");
    assert_eq!(h.scheduler.queue_len(), 5);

    let jobs = job_repo(&h).list_all().unwrap();
    assert_eq!(jobs.len(), 1);
    let job_id = &jobs[0].job_id;

    let expected: Vec<TaskType> = TaskType::PIPELINE.to_vec();
    for stage in expected {
        let task = h.scheduler.get_next_task().expect("queued task");
        assert_eq!(task.task_type, stage);
        assert_eq!(&task.job_id, job_id);
        assert_eq!(task.task_id, format!("{job_id}_{}", stage.stage_name()));
        assert_eq!(task.status, "pending");
    }
    assert!(h.scheduler.get_next_task().is_none());
}

#[test]
fn unknown_case_is_skipped_without_creating_a_job() {
    init_tracing();
    let h = harness();

    h.scheduler.schedule_case("ghost").expect("no-op");

    assert_eq!(h.scheduler.queue_len(), 0);
    assert!(job_repo(&h).list_all().unwrap().is_empty());
}

#[test]
fn tasks_come_out_fifo_across_cases() {
    init_tracing();
    let h = harness();
    h.fs.add_dir(SCAN_PATH, &["case-a", "case-b"]);
    h.case_service.scan_for_new_cases().unwrap();

    h.scheduler.schedule_case("case-a").unwrap();
    h.scheduler.schedule_case("case-b").unwrap();

    // All of case-a's pipeline drains before case-b's starts.
    let first_five: Vec<String> = (0..5)
        .map(|_| h.scheduler.get_next_task().unwrap().job_id)
        .collect();
    assert!(first_five.windows(2).all(|w| w[0] == w[1]));

    let sixth = h.scheduler.get_next_task().unwrap();
    assert_ne!(sixth.job_id, first_five[0]);
}

#[test]
fn complete_task_is_an_acknowledgement_only() {
    init_tracing();
    let h = harness();
    h.fs.add_dir(SCAN_PATH, &["case-a"]);
    h.case_service.scan_for_new_cases().unwrap();
    h.scheduler.schedule_case("case-a").unwrap();

    let task = h.scheduler.get_next_task().unwrap();
    h.scheduler.complete_task(&task.task_id);
    // The queue holds the remaining stages untouched.
    assert_eq!(h.scheduler.queue_len(), 4);
}

#[test]
fn orchestrator_discovers_schedules_and_queues_cases() {
    init_tracing();
    let h = harness();
    h.fs.add_dir(SCAN_PATH, &["case-a", "case-b"]);

    let orchestrator =
        WorkflowOrchestrator::new(Arc::clone(&h.case_service), Arc::clone(&h.scheduler));
    orchestrator.process_new_cases();

    assert_eq!(h.scheduler.queue_len(), 10);
    assert_eq!(job_repo(&h).list_all().unwrap().len(), 2);

    let cases = StateCaseRepository::new(Arc::clone(&h.fx.store));
    for case in cases.list_all().unwrap() {
        assert_eq!(case.status, CaseStatus::Queued);
    }

    // A second cycle over the same directory is a no-op.
    orchestrator.process_new_cases();
    assert_eq!(h.scheduler.queue_len(), 10);
}

#[test]
fn workers_allocate_the_configured_gpus_per_job() {
    init_tracing();
    let config = ConfigFileBuilder::new("state.json")
        .gpu_count(4)
        .gpus_per_job(2)
        .build();

    let h = harness();
    h.fs.add_dir(SCAN_PATH, &["case-a"]);
    h.case_service.scan_for_new_cases().unwrap();
    h.scheduler.schedule_case("case-a").unwrap();

    // Worker side: pull a task, resolve its job, allocate per config.
    let task = h.scheduler.get_next_task().unwrap();
    let mut job = h.job_service.get_job(&task.job_id).unwrap().unwrap();
    let per_job = config.resources.gpus_per_job as usize;
    assert!(
        h.job_service
            .allocate_resources_for_job(&mut job, per_job)
            .unwrap()
    );
    assert_eq!(job.gpu_allocation.len(), 2);

    h.job_service.complete_job(&job.job_id).unwrap();
}

#[test]
fn orchestrator_swallows_cycle_errors() {
    init_tracing();
    let h = harness();
    h.fs.fail_path(SCAN_PATH, "permission denied");

    let orchestrator =
        WorkflowOrchestrator::new(Arc::clone(&h.case_service), Arc::clone(&h.scheduler));
    // The failure is logged, not propagated.
    orchestrator.process_new_cases();
    assert_eq!(h.scheduler.queue_len(), 0);
}
