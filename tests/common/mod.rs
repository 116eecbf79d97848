// tests/common/mod.rs

#![allow(dead_code)]

pub use beamline_test_utils::init_tracing;

use std::sync::Arc;

use beamline::store::StateStore;
use tempfile::TempDir;

/// A state store backed by a temp directory, cleaned up on drop.
pub struct StoreFixture {
    pub dir: TempDir,
    pub store: Arc<StateStore>,
}

pub fn store_fixture() -> StoreFixture {
    let dir = TempDir::new().expect("create temp dir");
    let store =
        Arc::new(StateStore::open(dir.path().join("state.json")).expect("open state store"));
    StoreFixture { dir, store }
}
