//! Mined pattern routes.

use super::error_response;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use waypoint_types::{BrowsingPattern, PatternSnapshot};

#[derive(Deserialize)]
pub struct ListPatternsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Serialize)]
pub struct PatternsResponse {
    pub run_id: Uuid,
    pub mined_at: DateTime<Utc>,
    pub visits_considered: usize,
    pub total_count: usize,
    pub patterns: Vec<BrowsingPattern>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub run_id: Uuid,
    pub mined_at: DateTime<Utc>,
    pub visits_considered: usize,
    pub patterns_detected: usize,
}

impl From<&PatternSnapshot> for MineResponse {
    fn from(snapshot: &PatternSnapshot) -> Self {
        Self {
            run_id: snapshot.run_id,
            mined_at: snapshot.mined_at,
            visits_considered: snapshot.visits_considered,
            patterns_detected: snapshot.patterns.len(),
        }
    }
}

/// GET /api/patterns - Top patterns from the latest mining run.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPatternsQuery>,
) -> Json<PatternsResponse> {
    let snapshot = state.engine.snapshot();

    Json(PatternsResponse {
        run_id: snapshot.run_id,
        mined_at: snapshot.mined_at,
        visits_considered: snapshot.visits_considered,
        total_count: snapshot.patterns.len(),
        patterns: snapshot.patterns.iter().take(query.limit).cloned().collect(),
    })
}

/// POST /api/patterns/mine - Re-mine now instead of waiting for the next tick.
pub async fn mine(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MineResponse>, (StatusCode, String)> {
    let now = Utc::now().timestamp_millis();
    let snapshot = state.engine.remine(now).map_err(error_response)?;

    info!(
        target: "waypoint::api",
        "On-demand mining run {} ({} patterns)",
        snapshot.run_id,
        snapshot.patterns.len()
    );

    Ok(Json(MineResponse::from(snapshot.as_ref())))
}
