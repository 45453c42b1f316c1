//! Confidence scoring for patterns and transitions.

/// Decay constant for recency: one week in milliseconds.
pub const RECENCY_DECAY_MS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Occurrence count at which the frequency score saturates.
const FREQUENCY_SATURATION: f64 = 10.0;

const RECENCY_WEIGHT: f64 = 0.6;
const FREQUENCY_WEIGHT: f64 = 0.4;

/// `exp(-age / 7d)`. Timestamps in the future count as age zero.
pub fn recency_score(last_seen: i64, now: i64) -> f64 {
    let age = now.saturating_sub(last_seen).max(0) as f64;
    (-age / RECENCY_DECAY_MS).exp()
}

/// Linear in occurrences up to 10, then flat at 1.
pub fn frequency_score(frequency: u32) -> f64 {
    (f64::from(frequency) / FREQUENCY_SATURATION).min(1.0)
}

/// Pattern confidence, weighted towards recent behavior.
pub fn pattern_confidence(frequency: u32, last_seen: i64, now: i64) -> f64 {
    let score = RECENCY_WEIGHT * recency_score(last_seen, now)
        + FREQUENCY_WEIGHT * frequency_score(frequency);
    score.clamp(0.0, 1.0)
}

/// Share of a pattern's occurrences that led to one continuation, scaled by
/// the pattern's own confidence.
pub fn transition_confidence(count: u32, frequency: u32, pattern_confidence: f64) -> f64 {
    if frequency == 0 {
        return 0.0;
    }
    let share = f64::from(count) / f64::from(frequency);
    (share * pattern_confidence).clamp(0.0, 1.0)
}
