use crate::{
    AppCommand, AppResult,
    native_messaging::{NativeHost, Outbound},
};

use meetwatch_core::{Coordinator, HostEvent, RelayResponse};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Main application state.
///
/// Owns the [`Coordinator`] and feeds it one event at a time, so no two
/// handlers ever interleave. Replies to popup requests are written back
/// through the [`NativeHost`].
pub struct App {
    pub(crate) coordinator: Coordinator,
    pub(crate) host: Arc<NativeHost>,
    pub(crate) command_rx: mpsc::UnboundedReceiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Meetwatch starting");

        self.handle_event(HostEvent::Startup, None).await;

        loop {
            match self.command_rx.recv().await {
                Some(AppCommand::Dispatch { event, reply_to }) => {
                    self.handle_event(event, reply_to).await;
                }
                Some(AppCommand::Shutdown) => {
                    info!("Shutdown requested");
                    break;
                }
                None => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        // Keep whatever accrued since the last snapshot.
        self.coordinator.persist_snapshot().await;

        let _ = self.shutdown_tx.send(true);
        info!("Meetwatch shut down successfully");

        Ok(())
    }

    #[instrument(skip(self, event), fields(reply_to = ?reply_to))]
    async fn handle_event(&mut self, event: HostEvent, reply_to: Option<u64>) {
        let response = self.coordinator.dispatch(event).await;

        let Some(reply_to) = reply_to else {
            return;
        };

        // A request that produced no answer is still acknowledged so the
        // popup does not wait for a timeout.
        let response =
            response.unwrap_or_else(|| RelayResponse::ok(self.coordinator.status()));

        debug!(success = response.success, "Replying to popup");
        if let Err(e) = self
            .host
            .send(Outbound::Reply { reply_to, response })
            .await
        {
            warn!(error = %e, "Failed to send reply");
        }
    }
}
