// ─────────────────────────────────────────────────────────────────────
// Wavefield — Compute Backend
// ─────────────────────────────────────────────────────────────────────
//! Dedicated rayon pool that runs the per-cell evaluator.
//!
//! Each engine owns its pool, so frame work never competes with the
//! caller's use of the global rayon pool.

use rayon::{ThreadPool, ThreadPoolBuilder};

use wavefield_types::{WavefieldError, WavefieldResult};

/// Worker pool used for data-parallel frame evaluation.
pub struct ComputeBackend {
    pool: ThreadPool,
}

impl ComputeBackend {
    /// Build a pool with `worker_threads` workers (0 = rayon's default,
    /// normally one per logical CPU).
    ///
    /// Fails with `BackendUnavailable` if the threads cannot be spawned.
    pub fn acquire(worker_threads: usize) -> WavefieldResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|i| format!("wavefield-worker-{i}"))
            .build()
            .map_err(|e| WavefieldError::BackendUnavailable(e.to_string()))?;
        log::info!(
            "compute backend acquired: {} worker threads",
            pool.current_num_threads()
        );
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` inside the pool; nested rayon calls use its workers.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for ComputeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeBackend")
            .field("threads", &self.threads())
            .finish()
    }
}
