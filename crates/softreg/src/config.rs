//! Epoch configuration with builder pattern.
//!
//! [`EpochConfig`] carries the hyperparameters of one softmax regression
//! epoch. The `bon` builder validates them at `build()` time.
//!
//! # Example
//!
//! ```
//! use softreg::config::EpochConfig;
//! use softreg::Parallelism;
//!
//! // Defaults: learning_rate = 0.1, batch_size = 100
//! let config = EpochConfig::builder().build().unwrap();
//! assert_eq!(config.batch_size, 100);
//!
//! let config = EpochConfig::builder()
//!     .learning_rate(0.2)
//!     .batch_size(32)
//!     .parallelism(Parallelism::Parallel)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::training::Verbosity;
use crate::utils::Parallelism;

/// Default step size.
pub const DEFAULT_LEARNING_RATE: f32 = 0.1;

/// Default mini-batch size.
pub const DEFAULT_BATCH_SIZE: usize = 100;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Learning rate must be finite and positive.
    #[error("learning_rate must be finite and positive, got {0}")]
    InvalidLearningRate(f32),
    /// Batch size must be at least 1.
    #[error("batch_size must be at least 1")]
    InvalidBatchSize,
}

// =============================================================================
// EpochConfig
// =============================================================================

/// Hyperparameters for one epoch of mini-batch softmax regression.
///
/// The number of classes is not part of the config; it is read from the
/// column count of the weight matrix.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[serde(default)]
pub struct EpochConfig {
    /// Step size applied to the batch-averaged gradient. Default: 0.1.
    #[builder(default = DEFAULT_LEARNING_RATE)]
    pub learning_rate: f32,

    /// Examples per mini-batch. Default: 100.
    ///
    /// Need not divide the sample count; the final batch may be shorter.
    /// A value larger than the sample count runs the epoch as one batch.
    #[builder(default = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Whether examples inside a batch may be processed in parallel.
    #[builder(default)]
    pub parallelism: Parallelism,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: epoch_config_builder::IsComplete> EpochConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `learning_rate` is not finite or `<= 0`
    /// - `batch_size == 0`
    pub fn build(self) -> Result<EpochConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl EpochConfig {
    /// Validate the configuration.
    ///
    /// Configs built through the builder are already valid; this matters for
    /// configs constructed literally or deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        Ok(())
    }
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            batch_size: DEFAULT_BATCH_SIZE,
            parallelism: Parallelism::default(),
            verbosity: Verbosity::default(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
