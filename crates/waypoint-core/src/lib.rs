//! Pattern mining and next-visit prediction for Waypoint.

mod db;
mod engine;
mod error;
mod metrics;
mod miner;
mod predictor;
mod scoring;

pub use db::{ImportStats, VisitStore};
pub use engine::{EngineSettings, PredictionBatch, PredictionEngine, RecordedVisit};
pub use error::WaypointError;
pub use metrics::MetricsStore;
pub use miner::{mine, mine_now};
pub use predictor::{predict, predict_detailed, PredictionConfig, PredictionRun};
pub use scoring::{
    frequency_score, pattern_confidence, recency_score, transition_confidence, RECENCY_DECAY_MS,
};

/// Result type for Waypoint operations.
pub type Result<T> = std::result::Result<T, WaypointError>;
