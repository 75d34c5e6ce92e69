//! Meetwatch Core Library
//!
//! Background coordination logic for the meeting-assistant browser extension:
//! login session, single-flight tab recording, and per-domain dwell-time
//! tracking. All host interaction goes through the traits in [`host`], so the
//! [`Coordinator`] can be driven without a browser.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use meetwatch_core::{
//!     Collaborators, Coordinator, CoordinatorSettings, CoreResult, HostEvent, StatusSink,
//! };
//!
//! async fn drive(collaborators: Collaborators, popup: Arc<dyn StatusSink>) -> CoreResult<()> {
//!     let mut coordinator =
//!         Coordinator::new(CoordinatorSettings::default(), collaborators, popup);
//!     coordinator.load().await?;
//!
//!     let response = coordinator
//!         .dispatch(HostEvent::TabActivated { tab_id: 7.into() })
//!         .await;
//!     assert!(response.is_none());
//!     Ok(())
//! }
//! ```

mod activity;
mod capture;
mod coordinator;
mod error;
mod host;
mod relay;
mod session;
mod status;

pub use {
    activity::{ActiveTabInfo, ActivityEntry, ActivityTracker, DailyActivityLog, WorkingHours},
    capture::{CaptureController, CaptureState, MeetingPatterns, RecordingSession, StopReason},
    coordinator::{AlarmKind, Collaborators, Coordinator, CoordinatorSettings, HostEvent},
    error::{CoreError, Result as CoreResult},
    host::{
        AudioSurface, AuthExchange, Backend, BrowserHost, Clock, DeliveryError, Identity,
        PersistedState, StateStorage, StatusSink, SystemClock, Tab, TabId,
    },
    relay::{RelayMessage, RelayResponse},
    session::{OAuthSettings, Session, SessionStore, User},
    status::{StatusBroadcaster, StatusSnapshot},
};

#[cfg(test)]
mod tests;
