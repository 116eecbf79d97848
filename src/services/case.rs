// src/services/case.rs

//! Case discovery and status tracking.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::models::{Case, CaseStatus};
use crate::domain::repositories::CaseRepository;
use crate::errors::{BeamlineError, Result};
use crate::fs::FileSystem;

/// Discovers case directories under the scan path and keeps their persisted
/// records current.
pub struct CaseService {
    repo: Arc<dyn CaseRepository>,
    fs: Arc<dyn FileSystem>,
    scan_path: PathBuf,
}

impl std::fmt::Debug for CaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseService")
            .field("scan_path", &self.scan_path)
            .finish_non_exhaustive()
    }
}

impl CaseService {
    pub fn new(repo: Arc<dyn CaseRepository>, fs: Arc<dyn FileSystem>, scan_path: PathBuf) -> Self {
        Self {
            repo,
            fs,
            scan_path,
        }
    }

    /// Scan the local data path and register every directory that has no
    /// case record yet.
    ///
    /// Returns the newly registered case ids in the order the listing
    /// produced them. A missing scan path is not an error: the scan simply
    /// finds nothing.
    pub fn scan_for_new_cases(&self) -> Result<Vec<String>> {
        let listing = match self.fs.list_directories(&self.scan_path) {
            Ok(listing) => listing,
            Err(BeamlineError::PathNotFound(path)) => {
                warn!(path = %path.display(), "scan path does not exist; skipping scan");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let known: std::collections::HashSet<String> = self
            .repo
            .list_all()?
            .into_iter()
            .map(|case| case.case_id)
            .collect();

        let mut registered = Vec::new();
        for case_id in listing {
            if known.contains(&case_id) {
                continue;
            }
            let case = Case::new(case_id.clone());
            self.repo.add(&case)?;
            info!(case_id, "registered new case");
            registered.push(case_id);
        }
        Ok(registered)
    }

    pub fn get_case(&self, case_id: &str) -> Result<Option<Case>> {
        self.repo.get(case_id)
    }

    pub fn list_cases(&self) -> Result<Vec<Case>> {
        self.repo.list_all()
    }

    /// Move a case to `status`, refreshing its `updated_at` timestamp.
    ///
    /// Unknown case ids are ignored; discovery and scheduling race benignly
    /// and a status update for a case that was never registered is not worth
    /// failing a cycle over.
    pub fn update_case_status(&self, case_id: &str, status: CaseStatus) -> Result<()> {
        let Some(mut case) = self.repo.get(case_id)? else {
            debug!(case_id, "status update for unknown case ignored");
            return Ok(());
        };
        case.status = status;
        case.updated_at = chrono::Utc::now();
        self.repo.update(&case)?;
        debug!(case_id, ?status, "case status updated");
        Ok(())
    }
}
