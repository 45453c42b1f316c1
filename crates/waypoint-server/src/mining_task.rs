//! Background re-mining of the visit history.

use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

/// Shortest interval the loop accepts, so a zero in the config cannot spin.
const MIN_INTERVAL_MS: u64 = 1_000;

/// Re-mine on a fixed interval. The first tick fires immediately, so the
/// predictor has patterns as soon as the server is up.
pub fn spawn_mining_loop(state: Arc<AppState>) -> JoinHandle<()> {
    let period = Duration::from_millis(
        state
            .engine
            .settings()
            .update_interval_ms
            .max(MIN_INTERVAL_MS),
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let engine = state.engine.clone();
            let now = chrono::Utc::now().timestamp_millis();
            match tokio::task::spawn_blocking(move || engine.remine(now)).await {
                Ok(Ok(snapshot)) => {
                    debug!(
                        target: "waypoint::engine",
                        "Background mining run {} finished",
                        snapshot.run_id
                    );
                }
                Ok(Err(e)) => {
                    warn!(target: "waypoint::engine", "Background mining failed: {}", e);
                }
                Err(e) => {
                    error!(target: "waypoint::engine", "Mining task panicked: {}", e);
                }
            }
        }
    })
}
