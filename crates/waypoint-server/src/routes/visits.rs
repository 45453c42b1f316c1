//! Visit ingestion and listing routes.

use super::error_response;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use waypoint_core::RecordedVisit;
use waypoint_types::VisitRecord;

/// Body of `POST /api/visits`.
#[derive(Deserialize)]
pub struct RecordVisitRequest {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Unix milliseconds; defaults to now.
    #[serde(default)]
    pub visit_time: Option<i64>,
    #[serde(default)]
    pub time_spent: Option<u32>,
}

#[derive(Deserialize)]
pub struct ListVisitsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Serialize)]
pub struct VisitsResponse {
    pub visits: Vec<VisitRecord>,
    pub total_count: u64,
}

/// POST /api/visits - Record a visit.
pub async fn record(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordVisitRequest>,
) -> Result<(StatusCode, Json<RecordedVisit>), (StatusCode, String)> {
    let visit_time = request
        .visit_time
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let Some(mut visit) = VisitRecord::from_url(&request.url, request.title, visit_time) else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("No domain in url '{}'", request.url),
        ));
    };
    visit.time_spent = request.time_spent;

    let recorded = state.engine.record_visit(visit).map_err(error_response)?;
    debug!(
        target: "waypoint::api",
        "Visit {} to {} (predicted: {:?})",
        recorded.id,
        recorded.visit.domain,
        recorded.predicted
    );

    Ok((StatusCode::CREATED, Json(recorded)))
}

/// GET /api/visits - Most recent visits inside the lookback window, oldest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListVisitsQuery>,
) -> Result<Json<VisitsResponse>, (StatusCode, String)> {
    let engine = &state.engine;
    let store = engine.store();
    let now = chrono::Utc::now().timestamp_millis();

    let visits = store
        .recent(engine.settings().history_lookback_days, query.limit, now)
        .map_err(error_response)?;
    let total_count = store.count().map_err(error_response)?;

    Ok(Json(VisitsResponse {
        visits,
        total_count,
    }))
}
