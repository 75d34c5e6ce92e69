//! Single-flight recording lifecycle.
//!
//! `Idle → Starting → Recording → Stopping → Idle`. Every termination trigger
//! goes through [`CaptureController::stop`] with its own [`StopReason`], so
//! teardown lives in exactly one place.

use crate::{
    CaptureState, Collaborators, CoreError, CoreResult, Identity, MeetingPatterns,
    RecordingSession, RelayMessage, StopReason, Tab, TabId,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Badge text shown on the recorded tab.
pub(crate) const RECORDING_BADGE: &str = "REC";

/// Owns the recording slot and drives the audio surface.
#[derive(Debug, Default)]
pub struct CaptureController {
    state: CaptureState,
    patterns: MeetingPatterns,
}

impl CaptureController {
    /// Controller accepting tabs that match `patterns`.
    pub fn new(patterns: MeetingPatterns) -> Self {
        Self {
            state: CaptureState::Idle,
            patterns,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Active recording, if any.
    pub fn recording(&self) -> Option<&RecordingSession> {
        self.state.recording()
    }

    /// Whether `url` is on a recognized meeting page.
    pub fn is_meeting_url(&self, url: &str) -> bool {
        self.patterns.matches(url)
    }

    /// Whether a navigation of `tab_id` to `url` should end the recording.
    pub fn navigated_away(&self, tab_id: TabId, url: &str) -> bool {
        self.state.tab_id() == Some(tab_id) && !self.is_meeting_url(url)
    }

    /// Start recording `tab_id` on behalf of `identity`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotAuthenticated`] when `identity` is `None`.
    /// - [`CoreError::AlreadyRecording`] when the slot is not idle; the
    ///   existing recording is left untouched.
    /// - [`CoreError::UnsupportedTab`] when the tab is not a meeting page.
    /// - Any failure after validation, once the stop path has cleaned up.
    #[instrument(skip(self, identity, collaborators))]
    pub async fn start(
        &mut self,
        tab_id: TabId,
        identity: Option<&Identity>,
        collaborators: &Collaborators,
    ) -> CoreResult<RecordingSession> {
        let identity = identity.ok_or_else(|| CoreError::NotAuthenticated {
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.ensure_idle()?;

        let tab = collaborators.browser.get_tab(tab_id).await?;

        // The tab lookup suspended us; another start may have won meanwhile.
        self.ensure_idle()?;

        let url = tab.url.clone().unwrap_or_default();
        if !self.is_meeting_url(&url) {
            return Err(CoreError::UnsupportedTab {
                url,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.state = CaptureState::Starting { tab_id };
        info!(tab_id = %tab_id, url = %url, "Starting capture");

        match self.begin_capture(&tab, url, identity, collaborators).await {
            Ok(session) => {
                info!(recording_id = %session.id, tab_id = %tab_id, "Recording started");
                Ok(session)
            }
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "Capture start failed, cleaning up");
                self.stop(
                    &StopReason::StartFailed(e.user_message()),
                    Some(identity),
                    collaborators,
                )
                .await;
                Err(e)
            }
        }
    }

    /// Tear down whatever is active. Safe to call in any state.
    ///
    /// Sub-step failures are logged; the controller always ends `Idle`. The
    /// backend hears about the end of stream only when a recording existed.
    /// Returns the recording that was stopped, if any.
    #[instrument(skip(self, identity, collaborators), fields(reason = %reason))]
    pub async fn stop(
        &mut self,
        reason: &StopReason,
        identity: Option<&Identity>,
        collaborators: &Collaborators,
    ) -> Option<RecordingSession> {
        let previous = std::mem::replace(&mut self.state, CaptureState::Stopping);
        let tab_id = previous.tab_id();
        let session = match previous {
            CaptureState::Recording(session) => Some(session),
            CaptureState::Idle => {
                debug!("Stop requested while idle");
                None
            }
            CaptureState::Starting { .. } | CaptureState::Stopping => None,
        };

        self.close_surface(collaborators).await;

        if let Some(tab_id) = tab_id
            && let Err(e) = collaborators.browser.set_badge(tab_id, "").await
        {
            warn!(tab_id = %tab_id, error = %e, "Failed to clear recording badge");
        }

        self.state = CaptureState::Idle;

        if let Some(session) = &session {
            let duration_secs = (collaborators.clock.now() - session.started_at).num_seconds();
            info!(recording_id = %session.id, duration_secs, "Recording stopped");

            match identity {
                Some(identity) => {
                    if let Err(e) = collaborators
                        .backend
                        .end_stream(identity, &session.id, &reason.to_string())
                        .await
                    {
                        warn!(recording_id = %session.id, error = %e, "End-of-stream notification failed");
                    }
                }
                None => warn!(
                    recording_id = %session.id,
                    "No identity for end-of-stream notification"
                ),
            }
        }

        session
    }

    /// Forward one encoded chunk to the backend.
    ///
    /// Chunks arriving outside `Recording` are dropped silently; late chunks
    /// after a stop are expected. Delivery failures are logged and the
    /// recording carries on. Returns whether the chunk was forwarded.
    #[instrument(skip(self, chunk, identity, collaborators), fields(chunk_len = chunk.len()))]
    pub async fn relay_audio_chunk(
        &self,
        chunk: &str,
        identity: Option<&Identity>,
        collaborators: &Collaborators,
    ) -> bool {
        let (Some(session), Some(identity)) = (self.state.recording(), identity) else {
            debug!("Dropping audio chunk outside an active recording");
            return false;
        };

        let payload = strip_data_url_prefix(chunk);
        if payload.is_empty() {
            debug!(recording_id = %session.id, "Dropping empty audio chunk");
            return false;
        }

        if let Err(e) = collaborators
            .backend
            .stream_chunk(identity, &session.id, payload)
            .await
        {
            warn!(recording_id = %session.id, error = %e, "Failed to forward audio chunk");
        }

        true
    }

    #[track_caller]
    fn ensure_idle(&self) -> CoreResult<()> {
        if self.state.is_idle() {
            Ok(())
        } else {
            Err(CoreError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    async fn begin_capture(
        &mut self,
        tab: &Tab,
        url: String,
        identity: &Identity,
        collaborators: &Collaborators,
    ) -> CoreResult<RecordingSession> {
        let stream_id = collaborators.browser.tab_media_stream_id(tab.id).await?;

        self.recreate_surface(collaborators).await?;

        collaborators
            .surface
            .relay(RelayMessage::StartOffscreenCapture {
                stream_id,
                user_id: identity.user_id.clone(),
            })
            .await?;

        if self.state != (CaptureState::Starting { tab_id: tab.id }) {
            return Err(CoreError::CaptureFailure {
                reason: "Start was superseded".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let session = RecordingSession::new(
            &identity.user_id,
            tab.id,
            url,
            collaborators.clock.now(),
        );
        self.state = CaptureState::Recording(session.clone());

        collaborators
            .browser
            .set_badge(tab.id, RECORDING_BADGE)
            .await?;

        Ok(session)
    }

    /// Exactly one surface may exist; a leftover one from an earlier crash is
    /// closed before a fresh one is created.
    async fn recreate_surface(&self, collaborators: &Collaborators) -> CoreResult<()> {
        if collaborators.surface.exists().await? {
            warn!("Found stale audio surface, closing it");
            collaborators.surface.close().await?;
        }
        collaborators.surface.create().await
    }

    async fn close_surface(&self, collaborators: &Collaborators) {
        match collaborators.surface.exists().await {
            Ok(true) => {
                if let Err(e) = collaborators
                    .surface
                    .relay(RelayMessage::StopOffscreenCapture)
                    .await
                {
                    warn!(error = %e, "Failed to relay stop to audio surface");
                }
                if let Err(e) = collaborators.surface.close().await {
                    warn!(error = %e, "Failed to close audio surface");
                }
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to query audio surface"),
        }
    }
}

/// Surfaces may hand over a data URL; only the base64 payload goes upstream.
pub(crate) fn strip_data_url_prefix(chunk: &str) -> &str {
    match chunk.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .unwrap_or(""),
        None => chunk,
    }
}
