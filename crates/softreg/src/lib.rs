//! softreg: mini-batch softmax regression epochs in Rust.
//!
//! Runs one epoch of multiclass logistic regression over a dense
//! row-major feature matrix, updating a `[n_features, n_classes]` weight
//! matrix in place.
//!
//! # Key Types
//!
//! - [`EpochTrainer`] - Runs one epoch over ndarray views or flat buffers
//! - [`EpochConfig`] - Learning rate, batch size, parallelism, verbosity
//! - [`EpochError`] - Everything a call can reject before touching the weights
//!
//! # Example
//!
//! ```
//! // Two examples, two features, two classes.
//! let x = [1.0f32, 0.0, 0.0, 1.0];
//! let y = [0u8, 1];
//! let mut theta = [0.0f32; 4];
//!
//! softreg::softmax_regression_epoch(&x, &y, &mut theta, 2, 2, 2, 0.1, 2).unwrap();
//!
//! softreg::testing::assert_slice_approx_eq(
//!     &theta,
//!     &[0.025, -0.025, -0.025, 0.025],
//!     softreg::testing::DEFAULT_TOLERANCE,
//!     "theta",
//! );
//! ```

// Re-export approx traits for users who want to compare weights
pub use approx;

pub mod config;
pub mod data;
pub mod error;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, EpochConfig};
pub use data::{ClassLabel, DataError};
pub use error::EpochError;
pub use training::{EpochTrainer, Verbosity};
pub use utils::Parallelism;

/// Run one sequential epoch over flat row-major buffers.
///
/// * `x` - `m * n` features, row-major
/// * `y` - `m` labels, each in `[0, k)`
/// * `theta` - `n * k` weights, row-major, updated in place
/// * `lr` - step size
/// * `batch` - examples per mini-batch
///
/// # Errors
///
/// Returns [`EpochError`] without modifying `theta` when a buffer length
/// disagrees with its counts, a label is out of range, `lr` is not a finite
/// positive number, or `batch == 0`.
#[allow(clippy::too_many_arguments)]
pub fn softmax_regression_epoch(
    x: &[f32],
    y: &[u8],
    theta: &mut [f32],
    m: usize,
    n: usize,
    k: usize,
    lr: f32,
    batch: usize,
) -> Result<(), EpochError> {
    let config = EpochConfig {
        learning_rate: lr,
        batch_size: batch,
        ..EpochConfig::default()
    };
    EpochTrainer::new(config).run_epoch_flat(x, y, theta, m, n, k)
}
