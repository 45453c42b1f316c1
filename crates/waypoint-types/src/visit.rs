//! Visit records: the raw browsing events the miner learns from.

use crate::normalize_domain;
use serde::{Deserialize, Serialize};

/// A single browsing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// URL as observed.
    pub url: String,
    /// Page title as observed.
    #[serde(default)]
    pub title: String,
    /// Normalized host (see [`normalize_domain`]).
    #[serde(default)]
    pub domain: String,
    /// Unix timestamp in milliseconds.
    pub visit_time: i64,
    /// Seconds spent before the next transition. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

impl VisitRecord {
    /// Build a record from an already-normalized domain.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        domain: impl Into<String>,
        visit_time: i64,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            domain: domain.into(),
            visit_time,
            time_spent: None,
        }
    }

    /// Build a record from a URL, deriving the domain.
    ///
    /// Returns `None` if no domain can be extracted from the URL.
    pub fn from_url(url: &str, title: impl Into<String>, visit_time: i64) -> Option<Self> {
        let domain = normalize_domain(url)?;
        Some(Self::new(url, title, domain, visit_time))
    }

    /// Attach the dwell time in seconds.
    pub fn with_time_spent(mut self, seconds: u32) -> Self {
        self.time_spent = Some(seconds);
        self
    }

    /// Whether the record can take part in mining.
    pub fn is_well_formed(&self) -> bool {
        !self.domain.trim().is_empty()
    }
}
