//! Seams between the coordinator and everything it does not own: the browser,
//! the audio processing surface, the backend, durable storage, status
//! observers and the wall clock.

mod audio_surface;
mod backend;
mod browser;
mod clock;
mod status_sink;
mod storage;

pub use {
    audio_surface::AudioSurface,
    backend::{AuthExchange, Backend, Identity},
    browser::{BrowserHost, Tab, TabId},
    clock::{Clock, SystemClock},
    status_sink::{DeliveryError, StatusSink},
    storage::{PersistedState, StateStorage},
};
