// src/store/repositories.rs

//! Typed repositories over the state store.
//!
//! Cases live under `cases.<id>`, jobs under `jobs.<id>`. Marshalling goes
//! through serde, which pins the wire format: lowercase status strings,
//! ISO-8601 UTC timestamps. Each write runs inside a scoped transaction:
//! a single `set` today, but the bracket keeps multi-key updates safe if a
//! repository ever grows one.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::models::{Case, Job};
use crate::domain::repositories::{CaseRepository, JobRepository};
use crate::errors::Result;
use crate::store::StateStore;

/// [`CaseRepository`] persisting to a [`StateStore`].
#[derive(Debug)]
pub struct StateCaseRepository {
    store: Arc<StateStore>,
}

impl StateCaseRepository {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }
}

impl CaseRepository for StateCaseRepository {
    fn add(&self, case: &Case) -> Result<()> {
        let record = serde_json::to_value(case)?;
        self.store
            .transaction(|s| s.set(&format!("cases.{}", case.case_id), record))
    }

    fn get(&self, case_id: &str) -> Result<Option<Case>> {
        decode_entity(self.store.get(&format!("cases.{case_id}")))
    }

    fn list_all(&self) -> Result<Vec<Case>> {
        decode_all(self.store.get("cases"))
    }

    fn update(&self, case: &Case) -> Result<()> {
        // Records are keyed by id, so an update is a full overwrite.
        self.add(case)
    }
}

/// [`JobRepository`] persisting to a [`StateStore`].
#[derive(Debug)]
pub struct StateJobRepository {
    store: Arc<StateStore>,
}

impl StateJobRepository {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }
}

impl JobRepository for StateJobRepository {
    fn add(&self, job: &Job) -> Result<()> {
        let record = serde_json::to_value(job)?;
        self.store
            .transaction(|s| s.set(&format!("jobs.{}", job.job_id), record))
    }

    fn get(&self, job_id: &str) -> Result<Option<Job>> {
        decode_entity(self.store.get(&format!("jobs.{job_id}")))
    }

    fn list_all(&self) -> Result<Vec<Job>> {
        decode_all(self.store.get("jobs"))
    }

    fn update(&self, job: &Job) -> Result<()> {
        self.add(job)
    }
}

fn decode_entity<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Result<Option<T>> {
    match value {
        Some(v) => Ok(Some(serde_json::from_value(v)?)),
        None => Ok(None),
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(root: Option<Value>) -> Result<Vec<T>> {
    let Some(Value::Object(records)) = root else {
        return Ok(Vec::new());
    };
    records
        .into_iter()
        .map(|(_, v)| serde_json::from_value(v).map_err(Into::into))
        .collect()
}
