//! Errors raised while validating caller-supplied buffers.

/// Shape and label validation errors.
///
/// These are detected before any weight is modified, so a call that fails
/// with a `DataError` leaves the weight matrix untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("invalid shape for {name}: expected {expected} elements, got {got}")]
    InvalidShape {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{what} mismatch: {left_name} has {left}, {right_name} has {right}")]
    DimensionMismatch {
        what: &'static str,
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    },

    #[error("label {label} at sample {index} is out of range for {n_classes} classes")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        n_classes: usize,
    },
}
