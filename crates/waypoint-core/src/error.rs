//! Error types for Waypoint.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaypointError {
    #[error("Invalid visit: {0}")]
    InvalidVisit(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
