// src/resources/mod.rs

//! GPU resource pool.
//!
//! Tracks a fixed inventory of GPU identifiers `{0, .., total-1}` and hands
//! out disjoint subsets to jobs. A single mutex makes allocate/release pairs
//! linearizable: at every observation point the sum of held and available
//! ids equals the inventory size, and no two concurrent allocations overlap.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

/// Concurrency-safe allocator for a fixed set of GPU ids.
#[derive(Debug)]
pub struct GpuPool {
    available: Mutex<HashSet<u32>>,
}

impl GpuPool {
    /// A pool owning ids `0..total_gpus`.
    pub fn new(total_gpus: u32) -> Self {
        Self {
            available: Mutex::new((0..total_gpus).collect()),
        }
    }

    /// Atomically remove and return exactly `count` ids, or `None` if fewer
    /// are available ("no allocation" is not an error).
    ///
    /// Selection order among available ids is unspecified; callers may rely
    /// only on the count and on disjointness from other live allocations.
    pub fn allocate(&self, count: usize) -> Option<Vec<u32>> {
        let mut available = self.lock();
        if count > available.len() {
            debug!(
                requested = count,
                available = available.len(),
                "gpu allocation refused; not enough free ids"
            );
            return None;
        }

        let allocated: Vec<u32> = available.iter().copied().take(count).collect();
        for id in &allocated {
            available.remove(id);
        }
        debug!(gpus = ?allocated, "allocated gpus");
        Some(allocated)
    }

    /// Atomically return ids to the pool.
    ///
    /// Releasing an id that is not currently held is accepted without error;
    /// keeping releases paired with allocations is the caller's contract.
    pub fn release(&self, gpu_ids: &[u32]) {
        let mut available = self.lock();
        available.extend(gpu_ids.iter().copied());
        debug!(gpus = ?gpu_ids, "released gpus");
    }

    /// Snapshot of how many ids are currently free.
    pub fn available_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<u32>> {
        self.available.lock().expect("gpu pool lock poisoned")
    }
}
