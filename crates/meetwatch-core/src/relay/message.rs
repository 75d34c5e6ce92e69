use crate::{StatusSnapshot, TabId};

use serde::{Deserialize, Serialize};

/// Tagged messages exchanged between the coordinator, the audio surface and
/// the popup. Serialized as `{"action": "<camelCase>", ...payload}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RelayMessage {
    /// Coordinator → surface: begin capturing the given stream.
    StartOffscreenCapture {
        /// Tab media stream handle.
        stream_id: String,
        /// User the audio belongs to.
        user_id: String,
    },
    /// Coordinator → surface: stop capturing.
    StopOffscreenCapture,
    /// Surface → coordinator: one encoded chunk (base64 or data URL).
    AudioChunk {
        /// Encoded audio.
        chunk: String,
    },
    /// Surface → coordinator: capture failed.
    RecordingError {
        /// Failure description.
        error: String,
    },
    /// Surface → coordinator: the stream ended on its own.
    RecordingStopped,
    /// Popup → coordinator: start the login flow.
    Login,
    /// Popup → coordinator: log out.
    Logout,
    /// Popup → coordinator: report current status.
    GetStatus,
    /// Popup → coordinator: record a tab.
    StartCapture {
        /// Tab to record.
        tab_id: TabId,
    },
    /// Popup → coordinator: stop recording.
    StopCapture,
    /// Coordinator → popup: status changed.
    UpdatePopupStatus {
        /// New status.
        status: StatusSnapshot,
    },
}

impl RelayMessage {
    /// Wire name of the action, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            RelayMessage::StartOffscreenCapture { .. } => "startOffscreenCapture",
            RelayMessage::StopOffscreenCapture => "stopOffscreenCapture",
            RelayMessage::AudioChunk { .. } => "audioChunk",
            RelayMessage::RecordingError { .. } => "recordingError",
            RelayMessage::RecordingStopped => "recordingStopped",
            RelayMessage::Login => "login",
            RelayMessage::Logout => "logout",
            RelayMessage::GetStatus => "getStatus",
            RelayMessage::StartCapture { .. } => "startCapture",
            RelayMessage::StopCapture => "stopCapture",
            RelayMessage::UpdatePopupStatus { .. } => "updatePopupStatus",
        }
    }
}
