//! Metrics describing the evolution of a vocabulary build.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reason the merge loop terminated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// The vocabulary reached the configured target size.
    TargetVocabReached,
    /// Every word collapsed to a single symbol; no bigram is left.
    NoBigrams,
    /// The best remaining bigram fell below the minimum frequency.
    BelowMinFrequency,
    /// The configured merge cap was reached.
    MaxMergesReached,
}

/// Metrics captured for each merge iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IterationMetrics {
    /// Sequential iteration number (1-indexed).
    pub iteration: usize,
    /// Symbol appended to the vocabulary.
    pub symbol: String,
    /// Count of the selected bigram.
    pub count: u64,
    /// Occurrences replaced across all segmentations.
    pub merges_applied: usize,
    /// Distinct bigrams seen during the counting pass.
    pub distinct_bigrams: usize,
    /// Execution time for the iteration.
    pub elapsed_iteration: Duration,
    /// Total time elapsed since the build started.
    pub elapsed_total: Duration,
}

/// Aggregate metrics produced by a vocabulary build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildMetrics {
    /// Per-iteration snapshots.
    pub iterations: Vec<IterationMetrics>,
    /// Total duration across all build calls.
    pub total_duration: Duration,
    /// Reason the most recent build call terminated; `None` before the first call.
    pub stop_reason: Option<StopReason>,
}

impl BuildMetrics {
    /// Creates an empty metrics container with pre-allocated capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            iterations: Vec::with_capacity(capacity),
            total_duration: Duration::ZERO,
            stop_reason: None,
        }
    }
}
