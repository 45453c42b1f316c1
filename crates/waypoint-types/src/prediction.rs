//! Tab predictions handed to presentation code.

use serde::{Deserialize, Serialize};

/// Confidence above which a prediction is worth pre-fetching.
pub const PRELOAD_CONFIDENCE: f64 = 0.7;

/// Why a prediction was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionReason {
    /// Continuation of a mined domain sequence.
    Sequential,
    /// Time-of-day habit. Reserved for external sources.
    Temporal,
    /// Page content similarity. Reserved for external sources.
    Contextual,
    /// Model-generated suggestion. Reserved for external sources.
    MlBased,
}

/// What the UI should do with a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedAction {
    Open,
    Switch,
    Preload,
}

impl SuggestedAction {
    /// `Preload` above [`PRELOAD_CONFIDENCE`], otherwise `Open`.
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence > PRELOAD_CONFIDENCE {
            SuggestedAction::Preload
        } else {
            SuggestedAction::Open
        }
    }
}

/// One candidate next visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabPrediction {
    pub domain: String,
    pub url: String,
    pub title: String,
    /// Score in [0, 1].
    pub confidence: f64,
    pub reason: PredictionReason,
    pub suggested_action: SuggestedAction,
    /// Signatures of the patterns that produced this prediction.
    #[serde(default)]
    pub patterns: Vec<String>,
}
