//! Prediction metrics routes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;
use waypoint_types::PredictionMetrics;

/// GET /api/metrics - Current counters.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<PredictionMetrics> {
    Json(state.engine.metrics())
}

/// POST /api/metrics/reset - Zero every counter.
pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.engine.reset_metrics();
    info!(target: "waypoint::api", "Metrics reset on request");
    StatusCode::NO_CONTENT
}
