// src/store/mod.rs

//! Transactional, file-persisted key/value state.
//!
//! [`StateStore`] keeps the whole application state as one JSON object tree
//! addressed by dot-separated paths (`"jobs.<id>.status"`). Every operation
//! is serialized behind a single mutex; persistence is atomic via a
//! temp-file-then-rename in the same directory, so a crash leaves either the
//! previous file or the new one (never a partial write) as the canonical
//! state.
//!
//! At most one transaction can be open at a time; there is no nesting. The
//! scoped [`StateStore::transaction`] helper is the intended way to group
//! writes: it commits on success and rolls back (and propagates) on error.
//!
//! The store is deliberately not a hot path: full-state snapshots on
//! `begin_transaction` and full-file writes on every persist trade
//! throughput for simplicity and crash consistency.

pub mod repositories;

pub use repositories::{StateCaseRepository, StateJobRepository};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{BeamlineError, Result};

#[derive(Debug)]
struct StoreInner {
    /// Committed state. Always a JSON object at the root.
    state: Value,
    /// Buffer for the currently open transaction, if any. While present,
    /// `get`/`set` operate on this buffer instead of `state`.
    txn: Option<Value>,
}

/// Thread-safe, file-persisted state tree.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    inner: Mutex<StoreInner>,
}

impl StateStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file yields an empty state; a present-but-unparsable file
    /// is a fatal [`BeamlineError::StateLoad`] requiring operator attention.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| BeamlineError::StateLoad {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            serde_json::from_str(&contents).map_err(|e| BeamlineError::StateLoad {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            debug!(path = %path.display(), "no existing state file; starting empty");
            Value::Object(Map::new())
        };

        Ok(Self {
            path,
            inner: Mutex::new(StoreInner { state, txn: None }),
        })
    }

    /// Read the value at a dot-separated path.
    ///
    /// Returns `None` if any segment is missing or the path descends into a
    /// non-object value. The returned value is an independent copy; mutating
    /// it cannot affect the store.
    pub fn get(&self, path: &str) -> Option<Value> {
        let inner = self.lock();
        let target = inner.txn.as_ref().unwrap_or(&inner.state);

        let mut current = target;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current.clone())
    }

    /// Write a value at a dot-separated path, creating intermediate objects.
    ///
    /// Outside a transaction the new state is persisted synchronously before
    /// returning; inside one, the write lands in the transaction buffer.
    /// Writing through an existing non-object intermediate is a
    /// [`BeamlineError::State`].
    pub fn set(&self, path: &str, value: Value) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let in_txn = inner.txn.is_some();
        let target = inner.txn.as_mut().unwrap_or(&mut inner.state);

        write_at_path(target, path, value)?;

        if !in_txn {
            persist(&self.path, &inner.state)?;
        }
        Ok(())
    }

    /// Snapshot the current state into a transaction buffer.
    ///
    /// Fails with [`BeamlineError::TransactionInProgress`] if a transaction
    /// is already open; only one at a time, no nesting.
    pub fn begin_transaction(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.txn.is_some() {
            return Err(BeamlineError::TransactionInProgress);
        }
        inner.txn = Some(inner.state.clone());
        Ok(())
    }

    /// Replace the durable state with the transaction buffer and persist
    /// atomically.
    pub fn commit(&self) -> Result<()> {
        let mut inner = self.lock();
        let txn = inner.txn.take().ok_or(BeamlineError::NoTransaction)?;
        inner.state = txn;
        persist(&self.path, &inner.state)
    }

    /// Discard the transaction buffer, leaving durable state unchanged.
    pub fn rollback(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.txn.take().is_none() {
            return Err(BeamlineError::NoTransaction);
        }
        Ok(())
    }

    /// Scoped transaction: begin, run `f`, commit on `Ok`, roll back and
    /// propagate on `Err`.
    ///
    /// The closure receives the store itself so its `get`/`set` calls hit
    /// the transaction buffer; each call takes the lock independently, so no
    /// reentrant locking is needed.
    pub fn transaction<T>(&self, f: impl FnOnce(&StateStore) -> Result<T>) -> Result<T> {
        self.begin_transaction()?;
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                self.rollback()?;
                Err(err)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock means a panic mid-operation; the state tree may be
        // torn, so refuse to limp on.
        self.inner.lock().expect("state store lock poisoned")
    }
}

/// Insert `value` at `path`, creating intermediate objects as needed.
fn write_at_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, intermediate) = segments
        .split_last()
        .ok_or_else(|| BeamlineError::State("empty state path".to_string()))?;

    let mut current = root;
    for segment in intermediate {
        let obj = current.as_object_mut().ok_or_else(|| {
            BeamlineError::State(format!(
                "path segment '{segment}' in '{path}' is not an object"
            ))
        })?;
        current = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let obj = current.as_object_mut().ok_or_else(|| {
        BeamlineError::State(format!(
            "path segment '{last}' in '{path}' descends into a non-object value"
        ))
    })?;
    obj.insert(last.to_string(), value);
    Ok(())
}

/// Write the full state to `<path>.tmp`, then rename over `path`.
///
/// The rename is the atomicity boundary: a crash before it leaves the
/// previous file intact, a crash after it leaves the new file intact.
fn persist(path: &Path, state: &Value) -> Result<()> {
    let temp_path = temp_path_for(path);

    let contents =
        serde_json::to_vec_pretty(state).map_err(|e| BeamlineError::StatePersist {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    fs::write(&temp_path, contents).map_err(|e| BeamlineError::StatePersist {
        path: path.to_path_buf(),
        reason: format!("writing {}: {e}", temp_path.display()),
    })?;

    fs::rename(&temp_path, path).map_err(|e| BeamlineError::StatePersist {
        path: path.to_path_buf(),
        reason: format!("renaming {} into place: {e}", temp_path.display()),
    })
}

/// Sibling temp file in the same directory, so the rename stays on one
/// filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
