//! Next-visit prediction from the current browsing context.

use crate::scoring::transition_confidence;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;
use waypoint_types::{BrowsingPattern, PredictionReason, SuggestedAction, TabPrediction};

const DEFAULT_MIN_PATTERN_OCCURRENCES: u32 = 2;
const DEFAULT_MIN_CONFIDENCE_THRESHOLD: f64 = 0.3;
const DEFAULT_MAX_PREDICTIONS_SHOWN: usize = 3;

/// Knobs for [`predict`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Patterns seen fewer times than this are ignored.
    pub min_pattern_occurrences: u32,
    /// Predictions scoring below this are dropped.
    pub min_confidence_threshold: f64,
    /// Maximum number of predictions returned.
    pub max_predictions_shown: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_pattern_occurrences: DEFAULT_MIN_PATTERN_OCCURRENCES,
            min_confidence_threshold: DEFAULT_MIN_CONFIDENCE_THRESHOLD,
            max_predictions_shown: DEFAULT_MAX_PREDICTIONS_SHOWN,
        }
    }
}

impl PredictionConfig {
    /// Clamp out-of-range values instead of rejecting them.
    pub fn sanitized(&self) -> Self {
        let min_confidence_threshold = if self.min_confidence_threshold.is_finite() {
            self.min_confidence_threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_MIN_CONFIDENCE_THRESHOLD
        };

        Self {
            min_pattern_occurrences: self.min_pattern_occurrences.max(1),
            min_confidence_threshold,
            max_predictions_shown: self.max_predictions_shown,
        }
    }
}

/// Result of a prediction pass with its bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionRun {
    /// Ranked, deduplicated, truncated predictions.
    pub predictions: Vec<TabPrediction>,
    /// Transitions that cleared the threshold before dedup and truncation.
    pub generated: usize,
}

/// Predict the next visits for `context` (oldest first) from mined patterns.
///
/// Returns an empty list when nothing matches; never fails.
pub fn predict<S: AsRef<str>>(
    context: &[S],
    patterns: &[BrowsingPattern],
    config: &PredictionConfig,
) -> Vec<TabPrediction> {
    predict_detailed(context, patterns, config).predictions
}

/// [`predict`], also reporting how many transitions were generated.
pub fn predict_detailed<S: AsRef<str>>(
    context: &[S],
    patterns: &[BrowsingPattern],
    config: &PredictionConfig,
) -> PredictionRun {
    let config = config.sanitized();
    if context.is_empty() || patterns.is_empty() {
        return PredictionRun::default();
    }

    let mut candidates = Vec::new();
    for pattern in patterns {
        if pattern.frequency < config.min_pattern_occurrences
            || !pattern.has_continuations()
            || !matches_context(context, &pattern.sequence)
        {
            continue;
        }

        let signature = pattern.signature();
        for (domain, &count) in &pattern.next_domains {
            let confidence = transition_confidence(count, pattern.frequency, pattern.confidence);
            if confidence < config.min_confidence_threshold {
                continue;
            }
            candidates.push(sequential_prediction(domain, confidence, signature.clone()));
        }
    }

    let generated = candidates.len();
    let mut predictions = dedupe_by_domain(candidates);
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(config.max_predictions_shown);

    trace!(
        target: "waypoint::predictor",
        "Context of {} domains: {} transitions, {} predictions",
        context.len(),
        generated,
        predictions.len()
    );

    PredictionRun {
        predictions,
        generated,
    }
}

/// A pattern matches when the context ends with its full sequence, so its
/// recorded continuations are exactly what came next in the past.
fn matches_context<S: AsRef<str>>(context: &[S], sequence: &[String]) -> bool {
    if sequence.is_empty() || context.len() < sequence.len() {
        return false;
    }
    context[context.len() - sequence.len()..]
        .iter()
        .zip(sequence)
        .all(|(seen, expected)| seen.as_ref() == expected)
}

fn sequential_prediction(domain: &str, confidence: f64, signature: String) -> TabPrediction {
    TabPrediction {
        domain: domain.to_string(),
        url: format!("https://{}/", domain),
        title: domain.to_string(),
        confidence,
        reason: PredictionReason::Sequential,
        suggested_action: SuggestedAction::for_confidence(confidence),
        patterns: vec![signature],
    }
}

/// Keep one prediction per domain: the most confident one, first seen on ties.
/// The survivor lists every contributing signature, its own first.
fn dedupe_by_domain(candidates: Vec<TabPrediction>) -> Vec<TabPrediction> {
    let mut kept: Vec<TabPrediction> = Vec::new();
    let mut by_domain: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let Some(&slot) = by_domain.get(&candidate.domain) else {
            by_domain.insert(candidate.domain.clone(), kept.len());
            kept.push(candidate);
            continue;
        };

        let existing = &mut kept[slot];
        if candidate.confidence > existing.confidence {
            let mut signatures = candidate.patterns;
            merge_signatures(&mut signatures, std::mem::take(&mut existing.patterns));
            *existing = TabPrediction {
                patterns: signatures,
                ..candidate
            };
        } else {
            merge_signatures(&mut existing.patterns, candidate.patterns);
        }
    }

    kept
}

fn merge_signatures(into: &mut Vec<String>, from: Vec<String>) {
    for signature in from {
        if !into.contains(&signature) {
            into.push(signature);
        }
    }
}
