// tests/property/state_paths.rs

use beamline::store::StateStore;
use proptest::prelude::*;
use serde_json::json;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,8}".prop_map(|s| s.to_string())
}

fn dot_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..4).prop_map(|segs| segs.join("."))
}

proptest! {
    // A set at any well-formed path is readable back at that exact path,
    // both inside the same store and after reopening from disk.
    #[test]
    fn set_get_persist_roundtrip(path in dot_path(), value in 0i64..1_000_000) {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("state.json");

        let store = StateStore::open(&file).unwrap();
        store.set(&path, json!(value)).unwrap();
        prop_assert_eq!(store.get(&path), Some(json!(value)));
        drop(store);

        let reopened = StateStore::open(&file).unwrap();
        prop_assert_eq!(reopened.get(&path), Some(json!(value)));
    }

    // Rolling a transaction back always restores the pre-transaction view.
    #[test]
    fn rollback_restores_previous_value(
        path in dot_path(),
        before in 0i64..1000,
        during in 0i64..1000,
    ) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = StateStore::open(dir.path().join("state.json")).unwrap();

        store.set(&path, json!(before)).unwrap();
        store.begin_transaction().unwrap();
        store.set(&path, json!(during)).unwrap();
        store.rollback().unwrap();

        prop_assert_eq!(store.get(&path), Some(json!(before)));
    }
}
