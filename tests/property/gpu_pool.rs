// tests/property/gpu_pool.rs

use std::collections::HashSet;

use beamline::resources::GpuPool;
use proptest::prelude::*;

// An arbitrary interleaving of allocations and releases. Allocations that
// the pool refuses are simply skipped, mirroring how the job service defers
// jobs when the pool is exhausted.
proptest! {
    #[test]
    fn ids_are_conserved_and_never_double_allocated(
        total in 1u32..32,
        ops in proptest::collection::vec((any::<bool>(), 0usize..8), 1..50),
    ) {
        let pool = GpuPool::new(total);
        let mut held: Vec<Vec<u32>> = Vec::new();

        for (is_alloc, n) in ops {
            if is_alloc {
                if let Some(gpus) = pool.allocate(n) {
                    prop_assert_eq!(gpus.len(), n);
                    held.push(gpus);
                }
            } else if !held.is_empty() {
                let gpus = held.remove(n % held.len());
                pool.release(&gpus);
            }

            // Held allocations are pairwise disjoint and every id is in
            // range.
            let mut seen = HashSet::new();
            for alloc in &held {
                for &id in alloc {
                    prop_assert!(id < total);
                    prop_assert!(seen.insert(id), "gpu {} allocated twice", id);
                }
            }

            // Conservation: held + available always equals the inventory.
            prop_assert_eq!(seen.len() + pool.available_count(), total as usize);
        }
    }
}
