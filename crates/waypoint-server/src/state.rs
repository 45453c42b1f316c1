//! Shared application state.

use crate::config::Config;
use std::sync::Arc;
use waypoint_core::{MetricsStore, PredictionEngine, VisitStore};

/// Shared application state.
pub struct AppState {
    pub engine: Arc<PredictionEngine>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> waypoint_core::Result<Self> {
        let store = Arc::new(VisitStore::open(&config.db_path)?);
        let metrics = Arc::new(MetricsStore::new());
        let engine = Arc::new(PredictionEngine::new(
            store,
            metrics,
            config.prediction.clone(),
        ));

        Ok(Self { engine, config })
    }
}
