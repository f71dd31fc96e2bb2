//! Crate-level error type.

use crate::config::ConfigError;
use crate::data::DataError;

/// Errors returned by an epoch call.
///
/// Every variant is detected before the weight matrix is modified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EpochError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Data(#[from] DataError),
}

/// Result type for epoch operations.
pub type Result<T> = std::result::Result<T, EpochError>;
