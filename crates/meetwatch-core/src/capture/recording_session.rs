use crate::TabId;

use chrono::{DateTime, Local};

/// The one recording that is currently active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSession {
    /// Correlation key sent with every chunk: `{userId}_{startedAt millis}`.
    pub id: String,
    /// Tab being recorded.
    pub tab_id: TabId,
    /// URL of the tab when recording started.
    pub tab_url: String,
    /// When recording started.
    pub started_at: DateTime<Local>,
}

impl RecordingSession {
    /// Create a session, deriving its id from the user and start time.
    pub fn new(
        user_id: &str,
        tab_id: TabId,
        tab_url: impl Into<String>,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: format!("{}_{}", user_id, started_at.timestamp_millis()),
            tab_id,
            tab_url: tab_url.into(),
            started_at,
        }
    }
}
