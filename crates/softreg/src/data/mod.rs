//! Input buffers: feature matrix, class labels and the weight matrix.
//!
//! All matrices are dense and row-major. The trainer borrows them as ndarray
//! views for the duration of one call and never keeps a reference.

mod error;
mod labels;
mod views;

pub use error::DataError;
pub use labels::ClassLabel;
pub use views::{check_labels, check_shapes, features_view, labels_view, theta_view_mut};
