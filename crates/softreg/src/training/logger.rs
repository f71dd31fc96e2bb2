//! Verbosity-gated training logs emitted as `tracing` events.
//!
//! Installing a subscriber is the caller's business; with none installed the
//! events are dropped.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Verbosity level for training output.
///
/// Ordered from quietest to loudest, so `verbosity >= Verbosity::Info`
/// reads as "at least info".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// Epoch start and end.
    Info,
    /// Every batch.
    Debug,
}

/// Logger for one epoch.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    /// Record the start of an epoch and its dimensions.
    pub fn start_epoch(
        &mut self,
        n_samples: usize,
        n_features: usize,
        n_classes: usize,
        batch_size: usize,
        n_batches: usize,
    ) {
        self.started = Some(Instant::now());

        if self.enabled(Verbosity::Warning) && batch_size > n_samples && n_samples > 0 {
            tracing::warn!(
                batch_size,
                n_samples,
                "batch size exceeds sample count; epoch runs as a single batch"
            );
        }
        if self.enabled(Verbosity::Info) {
            tracing::info!(
                n_samples,
                n_features,
                n_classes,
                batch_size,
                n_batches,
                "starting epoch"
            );
        }
    }

    /// Record one applied batch update.
    pub fn log_batch(&self, batch: usize, start: usize, end: usize) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(batch, start, end, len = end - start, "applied batch update");
        }
    }

    /// Record the end of the epoch with its wall time.
    pub fn finish_epoch(&mut self, n_batches: usize) {
        let elapsed = self.started.take().map(|t| t.elapsed());
        if self.enabled(Verbosity::Info) {
            let elapsed_ms = elapsed.map_or(0.0, |d| d.as_secs_f64() * 1000.0);
            tracing::info!(n_batches, elapsed_ms, "finished epoch");
        }
    }
}
