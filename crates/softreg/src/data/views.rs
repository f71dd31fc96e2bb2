//! Non-owning ndarray views over flat row-major buffers.
//!
//! The binding surface hands the trainer three contiguous buffers plus their
//! counts:
//!
//! - features `X`: `[n_samples * n_features]`, element `(i, j)` at `i * n_features + j`
//! - labels `y`: `[n_samples]`
//! - weights `theta`: `[n_features * n_classes]`, element `(f, c)` at `f * n_classes + c`
//!
//! The helpers here wrap those buffers as [`ArrayView2`] / [`ArrayViewMut2`]
//! without copying, after checking that each length matches its declared
//! shape. Indexing is then bounds-checked in one place (ndarray) instead of
//! by hand-written offset arithmetic.

use ndarray::{ArrayView1, ArrayView2, ArrayViewMut2};

use super::error::DataError;
use super::labels::ClassLabel;

fn expected_len(
    name: &'static str,
    rows: usize,
    cols: usize,
    got: usize,
) -> Result<usize, DataError> {
    rows.checked_mul(cols).ok_or(DataError::InvalidShape {
        name,
        expected: usize::MAX,
        got,
    })
}

fn check_len(name: &'static str, expected: usize, got: usize) -> Result<(), DataError> {
    if expected == got {
        Ok(())
    } else {
        Err(DataError::InvalidShape {
            name,
            expected,
            got,
        })
    }
}

/// View a flat feature buffer as `[n_samples, n_features]`.
///
/// # Errors
///
/// [`DataError::InvalidShape`] if `x.len() != n_samples * n_features`.
pub fn features_view(
    x: &[f32],
    n_samples: usize,
    n_features: usize,
) -> Result<ArrayView2<'_, f32>, DataError> {
    let expected = expected_len("features", n_samples, n_features, x.len())?;
    check_len("features", expected, x.len())?;
    ArrayView2::from_shape((n_samples, n_features), x).map_err(|_| DataError::InvalidShape {
        name: "features",
        expected,
        got: x.len(),
    })
}

/// View a flat label buffer as `[n_samples]`.
///
/// # Errors
///
/// [`DataError::InvalidShape`] if `y.len() != n_samples`.
pub fn labels_view<L: ClassLabel>(
    y: &[L],
    n_samples: usize,
) -> Result<ArrayView1<'_, L>, DataError> {
    check_len("labels", n_samples, y.len())?;
    Ok(ArrayView1::from(y))
}

/// View a flat weight buffer as `[n_features, n_classes]`, mutably.
///
/// # Errors
///
/// [`DataError::InvalidShape`] if `theta.len() != n_features * n_classes`.
pub fn theta_view_mut(
    theta: &mut [f32],
    n_features: usize,
    n_classes: usize,
) -> Result<ArrayViewMut2<'_, f32>, DataError> {
    let got = theta.len();
    let expected = expected_len("theta", n_features, n_classes, got)?;
    check_len("theta", expected, got)?;
    ArrayViewMut2::from_shape((n_features, n_classes), theta).map_err(|_| {
        DataError::InvalidShape {
            name: "theta",
            expected,
            got,
        }
    })
}

/// Check that features, labels and weights agree on `m` and `n`.
///
/// # Errors
///
/// [`DataError::DimensionMismatch`] naming the first disagreeing dimension.
pub fn check_shapes<L: ClassLabel>(
    features: &ArrayView2<'_, f32>,
    labels: &ArrayView1<'_, L>,
    theta: &ArrayViewMut2<'_, f32>,
) -> Result<(), DataError> {
    let (n_samples, n_features) = features.dim();
    if labels.len() != n_samples {
        return Err(DataError::DimensionMismatch {
            what: "sample count",
            left_name: "features",
            left: n_samples,
            right_name: "labels",
            right: labels.len(),
        });
    }
    if theta.nrows() != n_features {
        return Err(DataError::DimensionMismatch {
            what: "feature count",
            left_name: "features",
            left: n_features,
            right_name: "theta",
            right: theta.nrows(),
        });
    }
    Ok(())
}

/// Check that every label lies in `[0, n_classes)`.
///
/// # Errors
///
/// [`DataError::LabelOutOfRange`] for the first offending sample.
pub fn check_labels<L: ClassLabel>(
    labels: &ArrayView1<'_, L>,
    n_classes: usize,
) -> Result<(), DataError> {
    match labels
        .iter()
        .enumerate()
        .find(|(_, label)| label.class_index() >= n_classes)
    {
        Some((index, label)) => Err(DataError::LabelOutOfRange {
            index,
            label: label.class_index(),
            n_classes,
        }),
        None => Ok(()),
    }
}
