use crate::{DeliveryError, StatusSink, StatusSnapshot};

use std::sync::Arc;

use tracing::{debug, instrument, warn};

/// Pushes status to whichever observer is listening. Fire-and-forget.
pub struct StatusBroadcaster {
    sink: Arc<dyn StatusSink>,
}

impl StatusBroadcaster {
    /// Broadcaster delivering to `sink`.
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        Self { sink }
    }

    /// Push `status`. A closed observer is ignored; other failures are logged.
    #[instrument(skip(self))]
    pub async fn notify(&self, status: &StatusSnapshot) {
        match self.sink.deliver(status).await {
            Ok(()) => debug!("Status delivered"),
            Err(DeliveryError::NoReceiver) => {}
            Err(e) => warn!(error = %e, "Status delivery failed"),
        }
    }
}
