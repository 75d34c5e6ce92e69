use meetwatch_core::MeetingPatterns;

use serde::{Deserialize, Serialize};

/// Which pages may be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// URL fragments of supported meeting services.
    #[serde(default = "default_meeting_patterns")]
    pub meeting_patterns: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            meeting_patterns: default_meeting_patterns(),
        }
    }
}

fn default_meeting_patterns() -> Vec<String> {
    MeetingPatterns::default().patterns().to_vec()
}
