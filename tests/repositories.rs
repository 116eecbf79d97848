// tests/repositories.rs

mod common;
use crate::common::{init_tracing, store_fixture};

use std::sync::Arc;

use beamline::domain::{CaseRepository, CaseStatus, JobRepository, JobStatus};
use beamline::store::{StateCaseRepository, StateJobRepository};
use beamline_test_utils::builders::{CaseBuilder, JobBuilder};
use serde_json::json;

#[test]
fn case_roundtrips_field_for_field() {
    init_tracing();
    let fx = store_fixture();
    let repo = StateCaseRepository::new(Arc::clone(&fx.store));

    let case = CaseBuilder::new("case-001")
        .status(CaseStatus::Processing)
        .beam_count(12)
        .metadata("site", json!("main"))
        .build();
    repo.add(&case).expect("add");

    let loaded = repo.get("case-001").expect("get").expect("present");
    assert_eq!(loaded, case);
}

#[test]
fn unknown_ids_are_none() {
    init_tracing();
    let fx = store_fixture();
    let cases = StateCaseRepository::new(Arc::clone(&fx.store));
    let jobs = StateJobRepository::new(Arc::clone(&fx.store));

    assert!(cases.get("nope").unwrap().is_none());
    assert!(jobs.get("nope").unwrap().is_none());
    assert!(cases.list_all().unwrap().is_empty());
    assert!(jobs.list_all().unwrap().is_empty());
}

#[test]
fn statuses_serialize_lowercase_in_the_state_file() {
    init_tracing();
    let fx = store_fixture();
    let cases = StateCaseRepository::new(Arc::clone(&fx.store));
    let jobs = StateJobRepository::new(Arc::clone(&fx.store));

    cases
        .add(&CaseBuilder::new("c1").status(CaseStatus::Queued).build())
        .unwrap();
    jobs.add(
        &JobBuilder::new("j1", "c1")
            .status(JobStatus::Running)
            .gpu_allocation(&[0, 3])
            .build(),
    )
    .unwrap();

    assert_eq!(fx.store.get("cases.c1.status"), Some(json!("queued")));
    assert_eq!(fx.store.get("jobs.j1.status"), Some(json!("running")));
    assert_eq!(fx.store.get("jobs.j1.gpu_allocation"), Some(json!([0, 3])));
    // Timestamps are ISO-8601 strings, not numbers.
    assert!(
        fx.store
            .get("jobs.j1.created_at")
            .is_some_and(|v| v.is_string())
    );
}

#[test]
fn job_update_overwrites_the_record() {
    init_tracing();
    let fx = store_fixture();
    let repo = StateJobRepository::new(Arc::clone(&fx.store));

    let mut job = JobBuilder::new("j1", "c1").build();
    repo.add(&job).unwrap();

    job.status = JobStatus::Completed;
    job.gpu_allocation.clear();
    repo.update(&job).unwrap();

    let loaded = repo.get("j1").unwrap().unwrap();
    assert_eq!(loaded.status, JobStatus::Completed);
    assert!(loaded.gpu_allocation.is_empty());
}

#[test]
fn list_all_returns_every_record() {
    init_tracing();
    let fx = store_fixture();
    let repo = StateCaseRepository::new(Arc::clone(&fx.store));

    for id in ["alpha", "beta", "gamma"] {
        repo.add(&CaseBuilder::new(id).build()).unwrap();
    }

    let mut ids: Vec<String> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|c| c.case_id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["alpha", "beta", "gamma"]);
}
