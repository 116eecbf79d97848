// src/domain/repositories.rs

//! Repository contracts for the persisted entities.
//!
//! Concrete implementations marshal to/from the state store
//! (see `store::repositories`); tests can substitute in-memory fakes.

use crate::domain::models::{Case, Job};
use crate::errors::Result;

/// Typed CRUD view over persisted [`Case`] records.
pub trait CaseRepository: Send + Sync {
    fn add(&self, case: &Case) -> Result<()>;
    fn get(&self, case_id: &str) -> Result<Option<Case>>;
    fn list_all(&self) -> Result<Vec<Case>>;
    fn update(&self, case: &Case) -> Result<()>;
}

/// Typed CRUD view over persisted [`Job`] records.
pub trait JobRepository: Send + Sync {
    fn add(&self, job: &Job) -> Result<()>;
    fn get(&self, job_id: &str) -> Result<Option<Job>>;
    fn list_all(&self) -> Result<Vec<Job>>;
    fn update(&self, job: &Job) -> Result<()>;
}
