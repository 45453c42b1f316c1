//! Shared types for the Waypoint browsing predictor.

mod domain;
mod metrics;
mod pattern;
mod prediction;
mod visit;

pub use domain::*;
pub use metrics::*;
pub use pattern::*;
pub use prediction::*;
pub use visit::*;
