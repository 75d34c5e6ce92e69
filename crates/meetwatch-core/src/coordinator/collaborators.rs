use crate::{AudioSurface, Backend, BrowserHost, Clock, StateStorage};

use std::sync::Arc;

/// Handles to everything outside the coordinator's own state.
#[derive(Clone)]
pub struct Collaborators {
    /// Browser tab, badge and identity APIs.
    pub browser: Arc<dyn BrowserHost>,
    /// The isolated audio processing surface.
    pub surface: Arc<dyn AudioSurface>,
    /// Backend HTTP service.
    pub backend: Arc<dyn Backend>,
    /// Durable local storage.
    pub storage: Arc<dyn StateStorage>,
    /// Wall clock.
    pub clock: Arc<dyn Clock>,
}
