use crate::User;

use serde::{Deserialize, Serialize};

/// What an observer needs to render login and recording state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Whether a user is logged in.
    pub logged_in: bool,
    /// Logged-in user.
    pub user: Option<User>,
    /// Whether a recording is active.
    pub is_recording: bool,
    /// URL of the recorded tab while recording.
    pub recording_tab_url: Option<String>,
}
