use rayon::{ThreadPool, ThreadPoolBuilder};

/// Build a *local* Rayon pool so different benchmarks can test different
/// thread counts.
pub fn rayon_pool(n_threads: usize) -> ThreadPool {
    assert!(n_threads >= 1, "n_threads must be >= 1");
    ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .expect("failed to build rayon thread pool")
}
