use error_location::ErrorLocation;
use thiserror::Error;

/// Coordinator errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// OAuth flow or token exchange failed. The session is reset to logged out.
    #[error("Authentication failed: {reason} {location}")]
    Auth {
        /// Why the login attempt failed.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording is already starting, running or stopping.
    #[error("A recording is already in progress {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture requested while logged out.
    #[error("Not logged in {location}")]
    NotAuthenticated {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Target tab is not on a recognized meeting page.
    #[error("Tab is not a supported meeting page: {url} {location}")]
    UnsupportedTab {
        /// URL of the rejected tab (empty when the tab has none).
        url: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The audio processing surface could not capture.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailure {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A backend request failed or returned a non-success status.
    #[error("Network delivery failed: {reason} {location}")]
    NetworkDelivery {
        /// Description of the delivery failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A browser host call failed or the host went away.
    #[error("Host call failed: {reason} {location}")]
    Host {
        /// Description of the host failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Durable storage could not be read or written.
    #[error("Storage error: {reason} {location}")]
    Storage {
        /// Description of the storage failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Message suitable for the popup, without the source location suffix.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Auth { reason, .. } => format!("Login failed: {}", reason),
            CoreError::AlreadyRecording { .. } => "A recording is already in progress".to_string(),
            CoreError::NotAuthenticated { .. } => "Please log in first".to_string(),
            CoreError::UnsupportedTab { .. } => {
                "This tab is not a supported meeting page".to_string()
            }
            CoreError::CaptureFailure { reason, .. } => format!("Capture failed: {}", reason),
            CoreError::NetworkDelivery { reason, .. } => format!("Network error: {}", reason),
            CoreError::Host { reason, .. } => format!("Browser error: {}", reason),
            CoreError::Storage { reason, .. } => format!("Storage error: {}", reason),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
