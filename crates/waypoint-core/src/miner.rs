//! Frequent-subsequence mining over the visit log.
//!
//! Every run of 2 to 5 consecutive domains is counted, windows overlap, and
//! each occurrence also records which domain came right after it. Confidence
//! is computed once all windows have been seen.

use crate::scoring::pattern_confidence;
use std::collections::HashMap;
use tracing::debug;
use waypoint_types::{BrowsingPattern, VisitRecord, MAX_SEQUENCE_LEN, MIN_SEQUENCE_LEN};

/// Mine recurring domain sequences from an ordered visit log.
///
/// `now` (Unix milliseconds) anchors the recency decay, so the same input
/// always yields the same output. Records with an empty domain are skipped.
/// Patterns come back ranked by confidence, then frequency, then first
/// appearance.
pub fn mine(visits: &[VisitRecord], now: i64) -> Vec<BrowsingPattern> {
    let visits: Vec<&VisitRecord> = visits.iter().filter(|v| v.is_well_formed()).collect();
    if visits.len() < MIN_SEQUENCE_LEN {
        return Vec::new();
    }

    let mut patterns: Vec<BrowsingPattern> = Vec::new();
    let mut index: HashMap<Vec<&str>, usize> = HashMap::new();

    for len in MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN.min(visits.len()) {
        for (start, window) in visits.windows(len).enumerate() {
            let key: Vec<&str> = window.iter().map(|v| v.domain.as_str()).collect();
            let seen_at = window[len - 1].visit_time;

            let slot = match index.get(&key) {
                Some(&slot) => {
                    patterns[slot].observe(seen_at);
                    slot
                }
                None => {
                    let sequence = key.iter().map(|d| d.to_string()).collect();
                    patterns.push(BrowsingPattern::new(sequence, seen_at));
                    index.insert(key, patterns.len() - 1);
                    patterns.len() - 1
                }
            };

            if let Some(next) = visits.get(start + len) {
                patterns[slot].record_continuation(&next.domain);
            }
        }
    }

    for pattern in &mut patterns {
        pattern.confidence = pattern_confidence(pattern.frequency, pattern.last_seen, now);
    }

    // Stable sort: equal scores keep insertion order.
    patterns.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.frequency.cmp(&a.frequency))
    });

    debug!(
        target: "waypoint::miner",
        "Mined {} patterns from {} visits",
        patterns.len(),
        visits.len()
    );

    patterns
}

/// [`mine`] anchored at the current wall-clock time.
pub fn mine_now(visits: &[VisitRecord]) -> Vec<BrowsingPattern> {
    mine(visits, chrono::Utc::now().timestamp_millis())
}
