//! Prediction routes.

use super::error_response;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use waypoint_types::{normalize_domain, TabPrediction};

#[derive(Deserialize)]
pub struct PredictionsQuery {
    /// Comma-separated domains or URLs, oldest first; at least two are needed
    /// to match a pattern. Defaults to recent history.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Serialize)]
pub struct PredictionsResponse {
    /// Run whose patterns produced the predictions.
    pub run_id: Uuid,
    pub context: Vec<String>,
    pub predictions: Vec<TabPrediction>,
}

/// GET /api/predictions - Ranked next-visit predictions.
///
/// A mined sequence only matches when the context ends with all of it, and
/// sequences are at least two domains long, so a one-domain context yields
/// an empty list.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PredictionsQuery>,
) -> Result<Json<PredictionsResponse>, (StatusCode, String)> {
    let engine = &state.engine;

    let batch = match query.context.as_deref() {
        Some(raw) => engine.predict_for(&parse_context(raw)),
        None => engine.predict_current(),
    }
    .map_err(error_response)?;

    Ok(Json(PredictionsResponse {
        run_id: batch.snapshot.run_id,
        context: batch.context,
        predictions: batch.predictions,
    }))
}

/// Normalize each entry and drop the ones without a usable domain.
fn parse_context(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_domain).collect()
}
