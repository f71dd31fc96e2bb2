//! Training infrastructure for softmax regression.
//!
//! - [`EpochTrainer`]: one pass of mini-batch gradient descent over a dataset
//! - [`GradientBuffer`]: per-batch `[n_features, n_classes]` accumulator
//! - [`BatchRanges`]: contiguous, in-order batch boundaries
//! - [`softmax_inplace`]: numerically stable softmax
//! - [`TrainingLogger`], [`Verbosity`]: structured logging

mod batches;
mod epoch;
mod gradients;
mod logger;
mod softmax;

pub use batches::{n_batches, BatchRanges};
pub use epoch::EpochTrainer;
pub use gradients::GradientBuffer;
pub use logger::{TrainingLogger, Verbosity};
pub use softmax::{max_logit, softmax_inplace};
