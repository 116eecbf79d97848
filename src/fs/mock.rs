// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::FileSystem;
use crate::errors::{BeamlineError, Result};

/// In-memory [`FileSystem`] for tests.
///
/// Holds a map of directory paths to child directory names. Paths that were
/// never added report [`BeamlineError::PathNotFound`]; paths registered via
/// [`MockFileSystem::fail_path`] report an IO error, for exercising the
/// orchestrator's catch-and-log boundary.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    dirs: Arc<Mutex<HashMap<PathBuf, Vec<String>>>>,
    failing: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` as an existing directory containing `children`.
    pub fn add_dir(&self, path: impl AsRef<Path>, children: &[&str]) {
        self.dirs.lock().unwrap().insert(
            path.as_ref().to_path_buf(),
            children.iter().map(|c| c.to_string()).collect(),
        );
    }

    /// Make listings of `path` fail with an IO error carrying `message`.
    pub fn fail_path(&self, path: impl AsRef<Path>, message: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), message.to_string());
    }
}

impl FileSystem for MockFileSystem {
    fn list_directories(&self, path: &Path) -> Result<Vec<String>> {
        if let Some(message) = self.failing.lock().unwrap().get(path) {
            return Err(BeamlineError::Io(std::io::Error::other(message.clone())));
        }

        self.dirs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| BeamlineError::PathNotFound(path.to_path_buf()))
    }
}
