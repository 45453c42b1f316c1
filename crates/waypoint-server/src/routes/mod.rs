//! HTTP route handlers.

pub mod metrics;
pub mod patterns;
pub mod predictions;
pub mod visits;

use crate::state::AppState;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use waypoint_core::WaypointError;

/// Routes mounted under `/api`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/visits", get(visits::list).post(visits::record))
        .route("/patterns", get(patterns::list))
        .route("/patterns/mine", post(patterns::mine))
        .route("/predictions", get(predictions::list))
        .route("/metrics", get(metrics::get))
        .route("/metrics/reset", post(metrics::reset))
        .route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Map a core error onto an HTTP status and message.
pub(crate) fn error_response(e: WaypointError) -> (StatusCode, String) {
    let status = match e {
        WaypointError::InvalidVisit(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
