mod capture_state;
mod controller;
mod meeting_patterns;
mod recording_session;
mod stop_reason;

pub use {
    capture_state::CaptureState, controller::CaptureController,
    meeting_patterns::MeetingPatterns, recording_session::RecordingSession,
    stop_reason::StopReason,
};

#[cfg(test)]
pub(crate) use controller::strip_data_url_prefix;
