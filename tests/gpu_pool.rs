// tests/gpu_pool.rs

mod common;
use crate::common::init_tracing;

use std::collections::HashSet;
use std::sync::Arc;

use beamline::resources::GpuPool;

#[test]
fn allocates_until_exhausted_then_refuses() {
    init_tracing();
    let pool = GpuPool::new(4);

    let first = pool.allocate(2).expect("first allocation");
    assert_eq!(first.len(), 2);
    assert_eq!(pool.available_count(), 2);

    // Asking for more than what is left is a refusal, not an error.
    assert!(pool.allocate(3).is_none());
    assert_eq!(pool.available_count(), 2);

    let second = pool.allocate(2).expect("second allocation");
    assert_eq!(pool.available_count(), 0);

    let held: HashSet<u32> = first.iter().chain(second.iter()).copied().collect();
    assert_eq!(held.len(), 4, "allocations must be disjoint");
}

#[test]
fn release_makes_ids_available_again() {
    init_tracing();
    let pool = GpuPool::new(2);

    let held = pool.allocate(2).unwrap();
    assert!(pool.allocate(1).is_none());

    pool.release(&held);
    assert_eq!(pool.available_count(), 2);
    assert!(pool.allocate(2).is_some());
}

#[test]
fn releasing_an_unheld_id_is_harmless() {
    init_tracing();
    let pool = GpuPool::new(2);

    pool.release(&[0]);
    // The pool is a set: no duplicate ids appear.
    assert_eq!(pool.available_count(), 2);
}

#[test]
fn concurrent_allocations_never_overlap() {
    init_tracing();
    let pool = Arc::new(GpuPool::new(16));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            std::thread::spawn(move || pool.allocate(2).expect("16 ids cover 8 x 2"))
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "gpu {id} allocated twice");
        }
    }
    assert_eq!(seen.len(), 16);
    assert_eq!(pool.available_count(), 0);
}
