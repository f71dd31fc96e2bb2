//! One epoch of mini-batch softmax regression.
//!
//! The trainer walks `[0, n_samples)` in contiguous batches, in order, with no
//! shuffling. For every batch it:
//!
//! 1. zeroes the `[n_features, n_classes]` gradient accumulator,
//! 2. for every example computes the logits `x · theta`, a max-subtracted
//!    softmax `p`, and adds `(p - onehot(y)) ⊗ x` into the accumulator,
//! 3. applies `theta -= learning_rate * grad / batch_len` using the batch's
//!    actual length.
//!
//! Each batch reads the weights left by the previous batch's update.
//!
//! # Parallel batches
//!
//! With [`Parallelism::Parallel`] the work inside one batch is split in two
//! phases. First the residuals `p - onehot(y)` of all examples are computed
//! in parallel into a `[batch_len, n_classes]` scratch buffer. Then the
//! gradient rows are filled in parallel, one feature per task, each summing
//! the batch's examples in index order. Every gradient entry therefore sees
//! exactly the same sequence of additions as in the sequential loop, and the
//! two modes produce identical weights.

use std::ops::Range;

use ndarray::{s, ArrayView1, ArrayView2, ArrayViewMut2};
use rayon::prelude::*;

use crate::config::EpochConfig;
use crate::data::{
    check_labels, check_shapes, features_view, labels_view, theta_view_mut, ClassLabel,
};
use crate::error::Result;
use crate::utils::Parallelism;

use super::batches::{n_batches, BatchRanges};
use super::gradients::GradientBuffer;
use super::logger::TrainingLogger;
use super::softmax::softmax_inplace;

// ============================================================================
// Per-example kernel
// ============================================================================

/// Write `softmax(x · theta) - onehot(label)` into `out`.
///
/// `out` has one slot per class and doubles as the logits buffer.
#[inline]
fn softmax_residual(
    x_row: ArrayView1<'_, f32>,
    label: usize,
    theta: &ArrayView2<'_, f32>,
    out: &mut [f32],
) {
    for (c, logit) in out.iter_mut().enumerate() {
        *logit = x_row
            .iter()
            .zip(theta.column(c))
            .fold(0.0f32, |acc, (&x, &w)| acc + x * w);
    }

    softmax_inplace(out);
    out[label] -= 1.0;
}

// ============================================================================
// EpochWorkspace
// ============================================================================

/// Scratch memory owned by a single epoch call.
///
/// Allocated on entry and dropped on every exit path.
#[derive(Debug)]
struct EpochWorkspace {
    /// `[n_classes]`: logits, then probabilities, then residuals of one example.
    logits: Vec<f32>,
    /// `[max_batch_len * n_classes]`: residuals of a whole batch (parallel only).
    residuals: Vec<f32>,
    grads: GradientBuffer,
}

impl EpochWorkspace {
    fn new(
        n_features: usize,
        n_classes: usize,
        max_batch_len: usize,
        parallelism: Parallelism,
    ) -> Self {
        let residuals = if parallelism.is_parallel() {
            vec![0.0; max_batch_len * n_classes]
        } else {
            Vec::new()
        };
        Self {
            logits: vec![0.0; n_classes],
            residuals,
            grads: GradientBuffer::zeros(n_features, n_classes),
        }
    }

    /// Accumulate the gradient of one batch, example by example.
    fn accumulate_sequential<L: ClassLabel>(
        &mut self,
        features: &ArrayView2<'_, f32>,
        labels: &ArrayView1<'_, L>,
        theta: &ArrayView2<'_, f32>,
        batch: Range<usize>,
    ) {
        self.grads.reset();
        for i in batch {
            let x_row = features.row(i);
            softmax_residual(x_row, labels[i].class_index(), theta, &mut self.logits);
            self.grads.accumulate(x_row, &self.logits);
        }
    }

    /// Accumulate the gradient of one batch with rayon.
    fn accumulate_parallel<L: ClassLabel>(
        &mut self,
        features: &ArrayView2<'_, f32>,
        labels: &ArrayView1<'_, L>,
        theta: &ArrayView2<'_, f32>,
        batch: Range<usize>,
    ) {
        let n_classes = self.logits.len();
        let start = batch.start;
        let residuals = &mut self.residuals[..batch.len() * n_classes];

        residuals
            .par_chunks_mut(n_classes)
            .enumerate()
            .for_each(|(j, out)| {
                let i = start + j;
                softmax_residual(features.row(i), labels[i].class_index(), theta, out);
            });

        self.grads.reset();
        self.grads
            .accumulate_batch_parallel(features.slice(s![batch, ..]), residuals);
    }
}

// ============================================================================
// EpochTrainer
// ============================================================================

/// Runs single epochs of mini-batch softmax regression.
///
/// The trainer holds only its configuration. Each call borrows the features,
/// labels and weights for its duration and updates the weights in place;
/// running it again performs a second epoch, not a repeat of the first.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use softreg::config::EpochConfig;
/// use softreg::training::EpochTrainer;
///
/// let features = array![[1.0f32, 0.0], [0.0, 1.0]];
/// let labels = array![0u8, 1];
/// let mut theta = ndarray::Array2::<f32>::zeros((2, 2));
///
/// let config = EpochConfig::builder().learning_rate(0.1).batch_size(2).build().unwrap();
/// let trainer = EpochTrainer::new(config);
/// trainer
///     .run_epoch(features.view(), labels.view(), theta.view_mut())
///     .unwrap();
///
/// assert!((theta[[0, 0]] - 0.025).abs() < 1e-6);
/// assert!((theta[[0, 1]] + 0.025).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct EpochTrainer {
    config: EpochConfig,
}

impl EpochTrainer {
    pub fn new(config: EpochConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &EpochConfig {
        &self.config
    }

    /// Run one epoch, updating `theta` in place.
    ///
    /// # Arguments
    ///
    /// * `features` - `[n_samples, n_features]`
    /// * `labels` - `[n_samples]`, each in `[0, n_classes)`
    /// * `theta` - `[n_features, n_classes]`; `n_classes` is read from here
    ///
    /// # Errors
    ///
    /// Fails without touching `theta` if the configuration is invalid, the
    /// shapes disagree, or a label is out of range. A call that passes
    /// validation always completes.
    pub fn run_epoch<L: ClassLabel>(
        &self,
        features: ArrayView2<'_, f32>,
        labels: ArrayView1<'_, L>,
        mut theta: ArrayViewMut2<'_, f32>,
    ) -> Result<()> {
        self.config.validate()?;
        check_shapes(&features, &labels, &theta)?;

        let (n_samples, n_features) = features.dim();
        let n_classes = theta.ncols();
        check_labels(&labels, n_classes)?;

        let batch_size = self.config.batch_size;
        let learning_rate = self.config.learning_rate;
        let parallelism = self.config.parallelism;
        let n_batches = n_batches(n_samples, batch_size);

        let mut logger = TrainingLogger::new(self.config.verbosity);
        logger.start_epoch(n_samples, n_features, n_classes, batch_size, n_batches);

        let mut workspace = EpochWorkspace::new(
            n_features,
            n_classes,
            batch_size.min(n_samples),
            parallelism,
        );

        for (batch_idx, batch) in BatchRanges::new(n_samples, batch_size).enumerate() {
            let batch_len = batch.len();
            let (start, end) = (batch.start, batch.end);

            match parallelism {
                Parallelism::Sequential => {
                    workspace.accumulate_sequential(&features, &labels, &theta.view(), batch)
                }
                Parallelism::Parallel => {
                    workspace.accumulate_parallel(&features, &labels, &theta.view(), batch)
                }
            }
            workspace
                .grads
                .apply_update(&mut theta, learning_rate, batch_len);

            logger.log_batch(batch_idx, start, end);
        }

        logger.finish_epoch(n_batches);
        Ok(())
    }

    /// Run one epoch over flat row-major buffers.
    ///
    /// * `x` - `n_samples * n_features` features, `x[i * n_features + j]`
    /// * `y` - `n_samples` labels
    /// * `theta` - `n_features * n_classes` weights, `theta[f * n_classes + c]`
    ///
    /// # Errors
    ///
    /// As [`run_epoch`](Self::run_epoch), plus
    /// [`DataError::InvalidShape`](crate::data::DataError::InvalidShape) when
    /// a buffer length does not match its declared counts.
    pub fn run_epoch_flat<L: ClassLabel>(
        &self,
        x: &[f32],
        y: &[L],
        theta: &mut [f32],
        n_samples: usize,
        n_features: usize,
        n_classes: usize,
    ) -> Result<()> {
        let features = features_view(x, n_samples, n_features)?;
        let labels = labels_view(y, n_samples)?;
        let theta = theta_view_mut(theta, n_features, n_classes)?;
        self.run_epoch(features, labels, theta)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::data::DataError;
    use crate::error::EpochError;
    use crate::testing::{assert_slice_approx_eq, DEFAULT_TOLERANCE};
    use ndarray::{array, Array2};

    fn trainer(learning_rate: f32, batch_size: usize) -> EpochTrainer {
        EpochTrainer::new(
            EpochConfig::builder()
                .learning_rate(learning_rate)
                .batch_size(batch_size)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn softmax_residual_uniform_start() {
        let theta = Array2::<f32>::zeros((2, 2));
        let mut out = [0.0f32; 2];
        softmax_residual(ArrayView1::from(&[1.0, 0.0]), 0, &theta.view(), &mut out);
        assert_eq!(out, [-0.5, 0.5]);
    }

    #[test]
    fn end_to_end_two_examples() {
        let features = array![[1.0f32, 0.0], [0.0, 1.0]];
        let labels = array![0u8, 1];
        let mut theta = Array2::<f32>::zeros((2, 2));

        trainer(0.1, 2)
            .run_epoch(features.view(), labels.view(), theta.view_mut())
            .unwrap();

        assert_slice_approx_eq(
            theta.as_slice().unwrap(),
            &[0.025, -0.025, -0.025, 0.025],
            DEFAULT_TOLERANCE,
            "theta",
        );
    }

    #[test]
    fn single_feature_binary_gradient() {
        // n = 1, k = 2, one example x = 2, label 1, theta = 0.
        // p = [0.5, 0.5]; grad = [(0.5 - 0) * 2, (0.5 - 1) * 2] = [1, -1].
        let features = array![[2.0f32]];
        let labels = array![1u8];
        let mut theta = Array2::<f32>::zeros((1, 2));

        trainer(1.0, 1)
            .run_epoch(features.view(), labels.view(), theta.view_mut())
            .unwrap();

        assert_slice_approx_eq(
            theta.as_slice().unwrap(),
            &[-1.0, 1.0],
            DEFAULT_TOLERANCE,
            "theta",
        );
    }

    #[test]
    fn batches_see_previous_updates() {
        // Same example twice in separate batches: the second logits are no
        // longer zero, so the second step is smaller than the first.
        let features = array![[1.0f32], [1.0]];
        let labels = array![0u8, 0];
        let mut theta = Array2::<f32>::zeros((1, 2));

        trainer(1.0, 1)
            .run_epoch(features.view(), labels.view(), theta.view_mut())
            .unwrap();

        let first_step = 0.5f32;
        let total = theta[[0, 0]];
        assert!(total > first_step);
        assert!(total < 2.0 * first_step);
        assert!((theta[[0, 0]] + theta[[0, 1]]).abs() < DEFAULT_TOLERANCE);
    }

    #[test]
    fn parallel_matches_sequential_exactly() {
        let features = array![
            [0.5f32, -1.0, 2.0],
            [1.5, 0.25, -0.5],
            [-2.0, 1.0, 0.0],
            [0.0, 0.75, 1.25],
            [1.0, 1.0, 1.0],
        ];
        let labels = array![2u8, 0, 1, 2, 0];

        let mut seq = Array2::<f32>::from_elem((3, 3), 0.1);
        let mut par = seq.clone();

        let config = EpochConfig::builder().learning_rate(0.3).batch_size(2);
        EpochTrainer::new(config.clone().build().unwrap())
            .run_epoch(features.view(), labels.view(), seq.view_mut())
            .unwrap();
        EpochTrainer::new(config.parallelism(Parallelism::Parallel).build().unwrap())
            .run_epoch(features.view(), labels.view(), par.view_mut())
            .unwrap();

        assert_eq!(seq, par);
    }

    #[test]
    fn empty_epoch_is_noop() {
        let features = Array2::<f32>::zeros((0, 3));
        let labels = ndarray::Array1::<u8>::zeros(0);
        let mut theta = Array2::<f32>::from_elem((3, 2), 1.5);

        trainer(0.1, 4)
            .run_epoch(features.view(), labels.view(), theta.view_mut())
            .unwrap();

        assert!(theta.iter().all(|&w| w == 1.5));
    }

    #[test]
    fn out_of_range_label_leaves_theta_untouched() {
        let features = array![[1.0f32, 0.0], [0.0, 1.0]];
        let labels = array![0u8, 2];
        let mut theta = Array2::<f32>::from_elem((2, 2), 0.5);

        let err = trainer(0.1, 1)
            .run_epoch(features.view(), labels.view(), theta.view_mut())
            .unwrap_err();

        assert_eq!(
            err,
            EpochError::Data(DataError::LabelOutOfRange {
                index: 1,
                label: 2,
                n_classes: 2
            })
        );
        assert!(theta.iter().all(|&w| w == 0.5));
    }

    #[test]
    fn invalid_literal_config_is_rejected() {
        let trainer = EpochTrainer::new(EpochConfig {
            batch_size: 0,
            ..Default::default()
        });
        let mut theta = [0.0f32; 2];
        let err = trainer
            .run_epoch_flat(&[1.0], &[0u8], &mut theta, 1, 1, 2)
            .unwrap_err();
        assert_eq!(err, EpochError::Config(ConfigError::InvalidBatchSize));
    }

    #[test]
    fn flat_rejects_short_theta() {
        let mut theta = [0.0f32; 3];
        let err = trainer(0.1, 1)
            .run_epoch_flat(&[1.0, 0.0], &[0u8], &mut theta, 1, 2, 2)
            .unwrap_err();
        assert_eq!(
            err,
            EpochError::Data(DataError::InvalidShape {
                name: "theta",
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn wider_label_types() {
        let x = [1.0f32, 0.0, 0.0, 1.0];
        let mut theta_u8 = [0.0f32; 4];
        let mut theta_u32 = [0.0f32; 4];

        let t = trainer(0.1, 2);
        t.run_epoch_flat(&x, &[0u8, 1], &mut theta_u8, 2, 2, 2).unwrap();
        t.run_epoch_flat(&x, &[0u32, 1], &mut theta_u32, 2, 2, 2).unwrap();

        assert_eq!(theta_u8, theta_u32);
    }
}
