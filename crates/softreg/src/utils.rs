//! Common utilities used across the crate.

use serde::{Deserialize, Serialize};

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed inside a mini-batch.
///
/// When `Parallel`, the epoch trainer computes the residuals of one batch's
/// examples with `rayon` and then fills the gradient one feature row per
/// task. Batches themselves are always processed one after another, and the
/// resulting weights match `Sequential` exactly.
///
/// The trainer never builds a thread pool. Callers that want a specific
/// thread count wrap the call in `rayon::ThreadPool::install()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }
}
