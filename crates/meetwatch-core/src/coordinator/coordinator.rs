//! The state-owning coordinator and its single event dispatch.
//!
//! All decision logic lives here and in the components it owns; host
//! adapters only translate browser events into [`HostEvent`]s and execute the
//! calls made through [`Collaborators`].

use crate::{
    ActivityTracker, AlarmKind, CaptureController, Collaborators, CoordinatorSettings, CoreResult,
    HostEvent, OAuthSettings, RecordingSession, RelayMessage, RelayResponse, SessionStore,
    StatusBroadcaster, StatusSink, StatusSnapshot, StopReason, TabId, User,
};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

/// Owns session, capture and activity state for the lifetime of the process.
pub struct Coordinator {
    session: SessionStore,
    capture: CaptureController,
    tracker: ActivityTracker,
    broadcaster: StatusBroadcaster,
    oauth: OAuthSettings,
    collaborators: Collaborators,
    loaded: bool,
}

impl Coordinator {
    /// Coordinator with empty in-memory state. Call [`Coordinator::load`]
    /// before dispatching events.
    pub fn new(
        settings: CoordinatorSettings,
        collaborators: Collaborators,
        status_sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            session: SessionStore::default(),
            capture: CaptureController::new(settings.meeting_patterns),
            tracker: ActivityTracker::new(settings.working_hours),
            broadcaster: StatusBroadcaster::new(status_sink),
            oauth: settings.oauth,
            collaborators,
            loaded: false,
        }
    }

    /// Reload durable state and rebuild the active tab from the browser.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> CoreResult<()> {
        let state = self.collaborators.storage.load().await?;
        self.session.load(&state);
        self.tracker.load(state.daily_activity_log);
        self.tracker
            .refresh_from_active_tab(&self.collaborators)
            .await;
        self.loaded = true;

        info!(
            logged_in = self.session.session().is_logged_in(),
            "Coordinator state loaded"
        );

        Ok(())
    }

    /// Full status tuple, read from memory.
    pub fn status(&self) -> StatusSnapshot {
        let (logged_in, user) = self.session.status();
        let recording = self.capture.recording();
        StatusSnapshot {
            logged_in,
            user: user.cloned(),
            is_recording: recording.is_some(),
            recording_tab_url: recording.map(|r| r.tab_url.clone()),
        }
    }

    /// Session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Capture controller.
    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    /// Activity tracker.
    pub fn tracker(&self) -> &ActivityTracker {
        &self.tracker
    }

    /// Interactive login. Status is broadcast whatever the outcome.
    #[instrument(skip(self))]
    pub async fn login(&mut self) -> CoreResult<User> {
        let result = self.session.login(&self.oauth, &self.collaborators).await;
        self.broadcast().await;
        result
    }

    /// Stop any recording, then clear the session.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) {
        if !self.capture.state().is_idle() {
            self.stop_capture(StopReason::LoggedOut).await;
        }
        self.session.clear(&self.collaborators).await;
        self.broadcast().await;
    }

    /// Start recording `tab_id`.
    ///
    /// # Errors
    ///
    /// Precondition failures (`NotAuthenticated`, `AlreadyRecording`,
    /// `UnsupportedTab`) or any failure of the start sequence.
    #[instrument(skip(self))]
    pub async fn start_capture(&mut self, tab_id: TabId) -> CoreResult<RecordingSession> {
        let identity = self.session.identity();
        let result = self
            .capture
            .start(tab_id, identity.as_ref(), &self.collaborators)
            .await;
        self.broadcast().await;
        result
    }

    /// Stop recording for `reason`. Idempotent.
    #[instrument(skip(self))]
    pub async fn stop_capture(&mut self, reason: StopReason) -> Option<RecordingSession> {
        let identity = self.session.identity();
        let stopped = self
            .capture
            .stop(&reason, identity.as_ref(), &self.collaborators)
            .await;
        self.broadcast().await;
        stopped
    }

    /// Forward an audio chunk if a recording is active.
    pub async fn relay_audio_chunk(&mut self, chunk: &str) -> bool {
        let identity = self.session.identity();
        self.capture
            .relay_audio_chunk(chunk, identity.as_ref(), &self.collaborators)
            .await
    }

    /// Daily alarm.
    pub async fn flush_daily(&mut self) {
        let identity = self.session.identity();
        self.tracker
            .flush_daily(identity.as_ref(), &self.collaborators)
            .await;
    }

    /// Periodic persistence alarm.
    pub async fn persist_snapshot(&mut self) {
        self.tracker.persist_snapshot(&self.collaborators).await;
    }

    /// Translate one host event into coordinator operations.
    ///
    /// Popup requests get a [`RelayResponse`]; everything else returns `None`.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&mut self, event: HostEvent) -> Option<RelayResponse> {
        match event {
            HostEvent::Startup if self.loaded => {
                // Memory is newer than storage; keep it and only re-read the tab.
                self.persist_snapshot().await;
                self.tracker
                    .refresh_from_active_tab(&self.collaborators)
                    .await;
                debug!("Repeated startup, in-memory state kept");
                None
            }
            HostEvent::Startup => {
                if let Err(e) = self.load().await {
                    warn!(error = %e, "Failed to load persisted state");
                }
                None
            }
            HostEvent::TabActivated { tab_id } => {
                self.tracker
                    .on_tab_activated(tab_id, &self.collaborators)
                    .await;
                None
            }
            HostEvent::TabUpdated { tab_id, url } => {
                if let Some(url) = url {
                    self.on_tab_navigated(tab_id, &url).await;
                }
                None
            }
            HostEvent::TabRemoved { tab_id } => {
                if self.capture.state().tab_id() == Some(tab_id) {
                    self.stop_capture(StopReason::TabClosed).await;
                }
                self.tracker
                    .on_tab_removed(tab_id, self.collaborators.clock.now());
                None
            }
            HostEvent::WindowFocusChanged { focused } => {
                self.tracker
                    .on_focus_changed(focused, &self.collaborators)
                    .await;
                None
            }
            HostEvent::Alarm { alarm } => {
                match alarm {
                    AlarmKind::DailyFlush => self.flush_daily().await,
                    AlarmKind::PersistSnapshot => self.persist_snapshot().await,
                }
                None
            }
            HostEvent::Message { message } => self.handle_message(message).await,
        }
    }

    async fn on_tab_navigated(&mut self, tab_id: TabId, url: &str) {
        if self.capture.navigated_away(tab_id, url) {
            info!(tab_id = %tab_id, url = %url, "Recorded tab left the meeting");
            self.stop_capture(StopReason::NavigatedAway).await;
        }
        self.tracker
            .on_tab_url_changed(tab_id, url, self.collaborators.clock.now());
    }

    async fn handle_message(&mut self, message: RelayMessage) -> Option<RelayResponse> {
        debug!(action = message.action(), "Relay message received");

        match message {
            RelayMessage::Login => Some(match self.login().await {
                Ok(_) => RelayResponse::ok(self.status()),
                Err(e) => RelayResponse::failure(&e, self.status()),
            }),
            RelayMessage::Logout => {
                self.logout().await;
                Some(RelayResponse::ok(self.status()))
            }
            RelayMessage::GetStatus => Some(RelayResponse::ok(self.status())),
            RelayMessage::StartCapture { tab_id } => Some(match self.start_capture(tab_id).await {
                Ok(_) => RelayResponse::ok(self.status()),
                Err(e) => RelayResponse::failure(&e, self.status()),
            }),
            RelayMessage::StopCapture => {
                self.stop_capture(StopReason::UserRequested).await;
                Some(RelayResponse::ok(self.status()))
            }
            RelayMessage::AudioChunk { chunk } => {
                self.relay_audio_chunk(&chunk).await;
                None
            }
            RelayMessage::RecordingError { error } => {
                warn!(error = %error, "Audio surface reported a failure");
                self.stop_capture(StopReason::SurfaceError(error)).await;
                None
            }
            RelayMessage::RecordingStopped => {
                if !self.capture.state().is_idle() {
                    self.stop_capture(StopReason::SurfaceFinished).await;
                }
                None
            }
            RelayMessage::StartOffscreenCapture { .. }
            | RelayMessage::StopOffscreenCapture
            | RelayMessage::UpdatePopupStatus { .. } => {
                warn!(action = message.action(), "Ignoring outbound-only message");
                None
            }
        }
    }

    async fn broadcast(&self) {
        self.broadcaster.notify(&self.status()).await;
    }
}
