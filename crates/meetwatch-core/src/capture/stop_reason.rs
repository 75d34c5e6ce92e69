use std::fmt;

/// Why a recording was stopped. The display text is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The user pressed stop.
    UserRequested,
    /// The audio surface reported an internal failure.
    SurfaceError(String),
    /// The audio surface finished on its own (stream ended).
    SurfaceFinished,
    /// The recorded tab left the meeting allow-list.
    NavigatedAway,
    /// The recorded tab was closed.
    TabClosed,
    /// The user logged out.
    LoggedOut,
    /// The start sequence failed part way.
    StartFailed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::UserRequested => write!(f, "User requested"),
            StopReason::SurfaceError(error) => write!(f, "Recording error: {}", error),
            StopReason::SurfaceFinished => write!(f, "Recording finished"),
            StopReason::NavigatedAway => write!(f, "Tab navigated away from meeting"),
            StopReason::TabClosed => write!(f, "Recorded tab closed"),
            StopReason::LoggedOut => write!(f, "User logged out"),
            StopReason::StartFailed(error) => write!(f, "Start failed: {}", error),
        }
    }
}
