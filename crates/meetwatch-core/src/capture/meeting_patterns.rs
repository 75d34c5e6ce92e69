use serde::{Deserialize, Serialize};

/// URL fragments identifying supported meeting services.
pub(crate) const DEFAULT_MEETING_PATTERNS: [&str; 2] = ["meet.google.com/", "zoom.us/j/"];

/// Allow-list of meeting URL fragments, matched by substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingPatterns(Vec<String>);

impl Default for MeetingPatterns {
    fn default() -> Self {
        Self(DEFAULT_MEETING_PATTERNS.iter().map(|p| p.to_string()).collect())
    }
}

impl MeetingPatterns {
    /// Allow-list from explicit fragments. Blank fragments are discarded.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.trim().is_empty())
                .collect(),
        )
    }

    /// Whether `url` contains any allow-listed fragment.
    pub fn matches(&self, url: &str) -> bool {
        self.0.iter().any(|pattern| url.contains(pattern.as_str()))
    }

    /// Configured fragments.
    pub fn patterns(&self) -> &[String] {
        &self.0
    }
}
