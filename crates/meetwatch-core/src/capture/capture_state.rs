use crate::{RecordingSession, TabId};

/// Lifecycle of the single recording slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureState {
    /// Nothing recording; a new start is allowed.
    #[default]
    Idle,
    /// Acquiring the stream and preparing the audio surface.
    Starting {
        /// Tab being captured.
        tab_id: TabId,
    },
    /// Audio is being captured and streamed.
    Recording(RecordingSession),
    /// Teardown in progress.
    Stopping,
}

impl CaptureState {
    /// Whether a start would be accepted.
    pub fn is_idle(&self) -> bool {
        matches!(self, CaptureState::Idle)
    }

    /// Active recording, if the slot is in [`CaptureState::Recording`].
    pub fn recording(&self) -> Option<&RecordingSession> {
        match self {
            CaptureState::Recording(session) => Some(session),
            _ => None,
        }
    }

    /// Tab owning the slot while starting or recording.
    pub fn tab_id(&self) -> Option<TabId> {
        match self {
            CaptureState::Starting { tab_id } => Some(*tab_id),
            CaptureState::Recording(session) => Some(session.tab_id),
            CaptureState::Idle | CaptureState::Stopping => None,
        }
    }
}
