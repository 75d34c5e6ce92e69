use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// One row of the activity batch sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Bare hostname.
    pub domain: String,
    /// Accumulated foreground seconds.
    pub duration_seconds: u64,
}

/// Same-day foreground seconds per bare hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyActivityLog(BTreeMap<String, u64>);

impl DailyActivityLog {
    /// Add `seconds` to `domain`.
    pub fn add(&mut self, domain: &str, seconds: u64) {
        let total = self.0.entry(domain.to_string()).or_insert(0);
        *total = total.saturating_add(seconds);
    }

    /// Seconds accumulated for `domain`.
    pub fn seconds(&self, domain: &str) -> u64 {
        self.0.get(domain).copied().unwrap_or(0)
    }

    /// Seconds accumulated across all domains.
    pub fn total_seconds(&self) -> u64 {
        self.0.values().fold(0, |acc, s| acc.saturating_add(*s))
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of domains with accumulated time.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Batch rows in domain order.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.0
            .iter()
            .map(|(domain, seconds)| ActivityEntry {
                domain: domain.clone(),
                duration_seconds: *seconds,
            })
            .collect()
    }
}

/// Bare hostname of an http(s) URL. Browser-internal pages have none.
pub(crate) fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_ascii_lowercase())
}
