//! Mined browsing patterns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Shortest subsequence the miner tracks.
pub const MIN_SEQUENCE_LEN: usize = 2;
/// Longest subsequence the miner tracks.
pub const MAX_SEQUENCE_LEN: usize = 5;

/// A recurring run of consecutive domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowsingPattern {
    /// Ordered domains, between 2 and 5 long.
    pub sequence: Vec<String>,
    /// Number of times this exact run was observed.
    pub frequency: u32,
    /// Unix timestamp in milliseconds of the most recent occurrence.
    pub last_seen: i64,
    /// Time-decayed, frequency-weighted score in [0, 1].
    pub confidence: f64,
    /// Domain that immediately followed the run -> number of times.
    #[serde(default)]
    pub next_domains: BTreeMap<String, u32>,
}

impl BrowsingPattern {
    /// Create a pattern from its first occurrence.
    pub fn new(sequence: Vec<String>, seen_at: i64) -> Self {
        Self {
            sequence,
            frequency: 1,
            last_seen: seen_at,
            confidence: 0.0,
            next_domains: BTreeMap::new(),
        }
    }

    /// Register another occurrence ending at `seen_at`.
    pub fn observe(&mut self, seen_at: i64) {
        self.frequency += 1;
        self.last_seen = self.last_seen.max(seen_at);
    }

    /// Count a domain that followed this run.
    pub fn record_continuation(&mut self, domain: &str) {
        *self.next_domains.entry(domain.to_string()).or_insert(0) += 1;
    }

    /// Human-readable form of the sequence, e.g. `github.com → docs.rs`.
    pub fn signature(&self) -> String {
        self.sequence.join(" → ")
    }

    /// Whether any continuation was ever recorded.
    pub fn has_continuations(&self) -> bool {
        !self.next_domains.is_empty()
    }
}

/// Output of one mining run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSnapshot {
    /// Identifier of the run that produced these patterns.
    pub run_id: Uuid,
    /// When the run finished.
    pub mined_at: DateTime<Utc>,
    /// Number of visits that went into the run.
    pub visits_considered: usize,
    /// Patterns ranked by confidence.
    pub patterns: Vec<BrowsingPattern>,
}

impl PatternSnapshot {
    pub fn new(visits_considered: usize, patterns: Vec<BrowsingPattern>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            mined_at: Utc::now(),
            visits_considered,
            patterns,
        }
    }

    /// Snapshot used before the first mining run.
    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }
}
