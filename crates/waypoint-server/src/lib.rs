//! Waypoint server library - HTTP host for browsing pattern mining and prediction.
//!
//! This library provides the HTTP routes, background mining task, and application
//! state for the Waypoint server. It's separated from main.rs to enable integration testing.

pub mod config;
pub mod logging;
pub mod mining_task;
pub mod routes;
pub mod state;
