//! Per-batch gradient accumulator for the softmax regression weights.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2, Zip};

/// Gradient of the summed cross-entropy loss with respect to `theta`.
///
/// Shape `[n_features, n_classes]`, matching the weight matrix. Contributions
/// are summed over the examples of a batch; averaging happens only in
/// [`apply_update`](Self::apply_update), which divides by the actual batch
/// length.
///
/// # Example
///
/// ```
/// use ndarray::{array, ArrayView1};
/// use softreg::training::GradientBuffer;
///
/// let mut grads = GradientBuffer::zeros(2, 2);
/// // x = [1, 0], p = [0.5, 0.5], label 0 -> residual [-0.5, 0.5]
/// grads.accumulate(ArrayView1::from(&[1.0, 0.0]), &[-0.5, 0.5]);
/// assert_eq!(grads.as_array(), array![[-0.5, 0.5], [0.0, 0.0]]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBuffer {
    grads: Array2<f32>,
}

impl GradientBuffer {
    /// Create a zeroed accumulator.
    pub fn zeros(n_features: usize, n_classes: usize) -> Self {
        Self {
            grads: Array2::zeros((n_features, n_classes)),
        }
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.grads.nrows()
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.grads.ncols()
    }

    /// Accumulated gradient, `[n_features, n_classes]`.
    #[inline]
    pub fn as_array(&self) -> ArrayView2<'_, f32> {
        self.grads.view()
    }

    /// Zero every entry, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.grads.fill(0.0);
    }

    /// Add one example's contribution.
    ///
    /// `residual` is `p - onehot(y)`: the softmax probabilities with 1
    /// subtracted at the true class. Every entry receives
    /// `grad[f, c] += residual[c] * x[f]`.
    #[inline]
    pub fn accumulate(&mut self, x_row: ArrayView1<'_, f32>, residual: &[f32]) {
        debug_assert_eq!(x_row.len(), self.n_features());
        debug_assert_eq!(residual.len(), self.n_classes());

        let residual = ArrayView1::from(residual);
        for (mut grad_row, &x) in self.grads.rows_mut().into_iter().zip(x_row.iter()) {
            grad_row.scaled_add(x, &residual);
        }
    }

    /// Add a whole batch given its residual rows, one feature row per rayon task.
    ///
    /// `features` is `[batch_len, n_features]` and `residuals` holds
    /// `batch_len` consecutive rows of `n_classes` values. Each entry sums the
    /// examples in index order, so the result equals calling
    /// [`accumulate`](Self::accumulate) on each example in turn.
    pub fn accumulate_batch_parallel(&mut self, features: ArrayView2<'_, f32>, residuals: &[f32]) {
        let n_classes = self.n_classes();
        debug_assert_eq!(features.ncols(), self.n_features());
        debug_assert_eq!(residuals.len(), features.nrows() * n_classes);
        if n_classes == 0 {
            return;
        }

        Zip::from(self.grads.rows_mut())
            .and(features.columns())
            .par_for_each(|mut grad_row, x_col| {
                for (&x, residual) in x_col.iter().zip(residuals.chunks_exact(n_classes)) {
                    grad_row.scaled_add(x, &ArrayView1::from(residual));
                }
            });
    }

    /// Add another accumulator of the same shape into this one.
    pub fn merge(&mut self, other: &GradientBuffer) {
        debug_assert_eq!(self.grads.dim(), other.grads.dim());
        self.grads += &other.grads;
    }

    /// Apply the averaged step `theta -= learning_rate * grad / batch_len`.
    ///
    /// `batch_len` is the number of examples actually accumulated, so a short
    /// final batch is averaged over its own length.
    pub fn apply_update(
        &self,
        theta: &mut ArrayViewMut2<'_, f32>,
        learning_rate: f32,
        batch_len: usize,
    ) {
        debug_assert_eq!(theta.dim(), self.grads.dim());
        debug_assert!(batch_len > 0);

        let batch_len = batch_len as f32;
        theta.zip_mut_with(&self.grads, |w, &g| {
            *w -= learning_rate * g / batch_len;
        });
    }
}
