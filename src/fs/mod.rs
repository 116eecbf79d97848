// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use crate::errors::{BeamlineError, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// Deliberately narrow: directory listing is the only capability the
/// orchestration core consumes (case discovery). Tests substitute
/// [`mock::MockFileSystem`].
pub trait FileSystem: Send + Sync + Debug {
    /// Return the names of the directories directly under `path`.
    ///
    /// Fails with [`BeamlineError::PathNotFound`] if `path` does not exist.
    fn list_directories(&self, path: &Path) -> Result<Vec<String>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn list_directories(&self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Err(BeamlineError::PathNotFound(path.to_path_buf()));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}
