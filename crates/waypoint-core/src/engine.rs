//! Host for the miner and predictor.
//!
//! The engine loads the visit window from the store, keeps the latest mined
//! [`PatternSnapshot`] and the last prediction list, and feeds the metrics
//! store. Mining and prediction themselves stay pure; this is the only place
//! that holds state between runs.

use crate::db::VisitStore;
use crate::metrics::MetricsStore;
use crate::miner::mine;
use crate::predictor::{predict_detailed, PredictionConfig};
use crate::{Result, WaypointError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};
use waypoint_types::{BrowsingPattern, PatternSnapshot, PredictionMetrics, TabPrediction, VisitRecord};

/// Engine settings, including the predictor knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    #[serde(flatten)]
    pub prediction: PredictionConfig,
    /// How far back mining looks.
    pub history_lookback_days: u32,
    /// Most recent visits considered per mining run.
    pub history_limit: usize,
    /// Delay between background re-mines.
    pub update_interval_ms: u64,
    /// Number of recent domains used as the default prediction context.
    pub context_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            prediction: PredictionConfig::default(),
            history_lookback_days: 7,
            history_limit: 100,
            update_interval_ms: 30_000,
            context_size: 5,
        }
    }
}

/// Outcome of [`PredictionEngine::record_visit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedVisit {
    pub id: i64,
    pub visit: VisitRecord,
    /// Whether the visit had been predicted; `None` if no predictions were standing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<bool>,
}

/// Predictions together with the context and mining run that produced them.
#[derive(Debug, Clone)]
pub struct PredictionBatch {
    pub snapshot: Arc<PatternSnapshot>,
    pub context: Vec<String>,
    pub predictions: Vec<TabPrediction>,
}

pub struct PredictionEngine {
    store: Arc<VisitStore>,
    metrics: Arc<MetricsStore>,
    settings: EngineSettings,
    snapshot: RwLock<Arc<PatternSnapshot>>,
    last_predictions: RwLock<Vec<TabPrediction>>,
}

impl PredictionEngine {
    pub fn new(store: Arc<VisitStore>, metrics: Arc<MetricsStore>, settings: EngineSettings) -> Self {
        Self {
            store,
            metrics,
            settings,
            snapshot: RwLock::new(Arc::new(PatternSnapshot::empty())),
            last_predictions: RwLock::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<VisitStore> {
        &self.store
    }

    /// Re-mine the lookback window and swap in the new snapshot.
    pub fn remine(&self, now: i64) -> Result<Arc<PatternSnapshot>> {
        let visits = self.store.recent(
            self.settings.history_lookback_days,
            self.settings.history_limit,
            now,
        )?;
        let patterns = mine(&visits, now);

        let min_occurrences = self.settings.prediction.sanitized().min_pattern_occurrences;
        let learned = patterns
            .iter()
            .filter(|p| p.frequency >= min_occurrences)
            .count();
        self.metrics.record_mining(patterns.len(), learned);

        let snapshot = Arc::new(PatternSnapshot::new(visits.len(), patterns));
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();

        info!(
            target: "waypoint::engine",
            "Mining run {}: {} patterns ({} learned) from {} visits",
            snapshot.run_id,
            snapshot.patterns.len(),
            learned,
            snapshot.visits_considered
        );
        Ok(snapshot)
    }

    /// The latest mined snapshot.
    pub fn snapshot(&self) -> Arc<PatternSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Top patterns of the latest snapshot.
    pub fn patterns(&self, limit: Option<usize>) -> Vec<BrowsingPattern> {
        let snapshot = self.snapshot();
        let limit = limit.unwrap_or(snapshot.patterns.len());
        snapshot.patterns.iter().take(limit).cloned().collect()
    }

    /// Predict the next visits for an explicit context, oldest domain first.
    ///
    /// A pattern only contributes when the context ends with its whole
    /// sequence, so a context needs at least two domains to match anything.
    pub fn predict_for<S: AsRef<str>>(&self, context: &[S]) -> Result<PredictionBatch> {
        let snapshot = self.snapshot();
        let run = predict_detailed(context, &snapshot.patterns, &self.settings.prediction);

        let mut predictions = run.predictions;
        for prediction in &mut predictions {
            if let Some(latest) = self.store.latest_for_domain(&prediction.domain)? {
                prediction.url = latest.url;
                if !latest.title.trim().is_empty() {
                    prediction.title = latest.title;
                }
            }
        }

        self.metrics.record_predictions(run.generated, &predictions);
        *self
            .last_predictions
            .write()
            .unwrap_or_else(PoisonError::into_inner) = predictions.clone();

        debug!(
            target: "waypoint::engine",
            "Predicted {} of {} transitions from run {}",
            predictions.len(),
            run.generated,
            snapshot.run_id
        );
        Ok(PredictionBatch {
            snapshot,
            context: context.iter().map(|d| d.as_ref().to_string()).collect(),
            predictions,
        })
    }

    /// Predict from the most recent visits in the store.
    pub fn predict_current(&self) -> Result<PredictionBatch> {
        let context = self.store.recent_domains(self.settings.context_size)?;
        self.predict_for(&context)
    }

    /// The list returned by the last prediction call.
    pub fn last_predictions(&self) -> Vec<TabPrediction> {
        self.last_predictions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Store a visit and score it against the standing predictions.
    ///
    /// A prediction list is scored once: the first visit after it was
    /// produced counts as a hit or a miss, later visits are not evaluated
    /// until predictions are requested again. A visit that fails to store
    /// leaves the standing predictions and the metrics untouched.
    pub fn record_visit(&self, visit: VisitRecord) -> Result<RecordedVisit> {
        if !visit.is_well_formed() {
            return Err(WaypointError::InvalidVisit(format!(
                "no domain for url '{}'",
                visit.url
            )));
        }

        // Nothing is scored unless the visit was actually stored.
        let id = self.store.insert(&visit)?;

        let standing = std::mem::take(
            &mut *self
                .last_predictions
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let predicted = if standing.is_empty() {
            None
        } else {
            let hit = standing.iter().any(|p| p.domain == visit.domain);
            self.metrics.record_outcome(hit);
            Some(hit)
        };

        debug!(target: "waypoint::engine", "Recorded visit {} to {}", id, visit.domain);

        Ok(RecordedVisit {
            id,
            visit,
            predicted,
        })
    }

    pub fn metrics(&self) -> PredictionMetrics {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}
