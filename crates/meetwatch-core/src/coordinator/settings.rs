use crate::{MeetingPatterns, OAuthSettings, WorkingHours};

/// Tunables the coordinator is built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorSettings {
    /// OAuth client for login.
    pub oauth: OAuthSettings,
    /// Window in which dwell time accrues.
    pub working_hours: WorkingHours,
    /// Meeting pages that may be recorded.
    pub meeting_patterns: MeetingPatterns,
}
