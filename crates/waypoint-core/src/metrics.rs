//! Injected store for prediction-quality counters.

use std::sync::{PoisonError, RwLock};
use tracing::debug;
use waypoint_types::{PredictionMetrics, TabPrediction};

/// Accumulates [`PredictionMetrics`] across mining and prediction runs.
///
/// Created by the host at session start and shared with whoever needs to
/// read or update it.
#[derive(Debug, Default)]
pub struct MetricsStore {
    metrics: RwLock<PredictionMetrics>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the output of one mining run.
    pub fn record_mining(&self, patterns_detected: usize, sequences_learned: usize) {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        metrics.patterns_detected += patterns_detected as u64;
        metrics.sequences_learned += sequences_learned as u64;
    }

    /// Add the output of one prediction run.
    pub fn record_predictions(&self, generated: usize, shown: &[TabPrediction]) {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        metrics.predictions_generated += generated as u64;

        if shown.is_empty() {
            return;
        }

        let previous = metrics.predictions_shown as f64;
        let added: f64 = shown.iter().map(|p| p.confidence).sum();
        metrics.predictions_shown += shown.len() as u64;
        metrics.avg_confidence =
            (metrics.avg_confidence * previous + added) / metrics.predictions_shown as f64;
    }

    /// Score a visit against the predictions that were standing when it happened.
    pub fn record_outcome(&self, hit: bool) {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        metrics.outcomes_evaluated += 1;
        if hit {
            metrics.outcomes_hit += 1;
        }
        metrics.accuracy = metrics.outcomes_hit as f64 / metrics.outcomes_evaluated as f64;
    }

    pub fn snapshot(&self) -> PredictionMetrics {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Zero every counter.
    pub fn reset(&self) {
        *self.metrics.write().unwrap_or_else(PoisonError::into_inner) = PredictionMetrics::default();
        debug!(target: "waypoint::metrics", "Prediction metrics reset");
    }
}
