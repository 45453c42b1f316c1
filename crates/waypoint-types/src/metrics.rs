//! Aggregate prediction-quality counters.

use serde::{Deserialize, Serialize};

/// Counters accumulated across mining and prediction runs.
///
/// All fields are zero until the first run, and only go back to zero on an
/// explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetrics {
    /// Patterns produced, summed over mining runs.
    pub patterns_detected: u64,
    /// Patterns frequent enough to drive predictions, summed over mining runs.
    pub sequences_learned: u64,
    /// Transitions that passed the confidence threshold.
    pub predictions_generated: u64,
    /// Predictions actually returned after dedup and truncation.
    pub predictions_shown: u64,
    /// Mean confidence of shown predictions.
    pub avg_confidence: f64,
    /// Share of evaluated visits that had been predicted.
    pub accuracy: f64,
    /// Visits checked against a standing prediction list.
    #[serde(default)]
    pub outcomes_evaluated: u64,
    /// Evaluated visits whose domain was among the predictions.
    #[serde(default)]
    pub outcomes_hit: u64,
}
