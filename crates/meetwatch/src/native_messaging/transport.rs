//! Reader and writer tasks for the stdio pipe.

use crate::{
    AppCommand, AppError, AppResult,
    native_messaging::{Inbound, NativeHost, Outbound, read_frame, write_frame},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
};
use tracing::{debug, info, instrument, warn};

/// Read frames until the extension disconnects.
///
/// Call responses go straight to the [`NativeHost`] so a coordinator blocked
/// on a host call keeps making progress. Everything else becomes an
/// [`AppCommand::Dispatch`]. When the stream ends, pending calls are failed
/// and the app is told to shut down.
#[instrument(skip_all)]
pub(crate) async fn run_reader<R>(
    mut reader: R,
    host: Arc<NativeHost>,
    command_tx: mpsc::UnboundedSender<AppCommand>,
) -> AppResult<()>
where
    R: AsyncRead + Unpin,
{
    let result = read_loop(&mut reader, &host, &command_tx).await;

    host.fail_pending().await;
    if command_tx.send(AppCommand::Shutdown).is_err() {
        debug!("App already stopped");
    }

    result
}

async fn read_loop<R>(
    reader: &mut R,
    host: &NativeHost,
    command_tx: &mpsc::UnboundedSender<AppCommand>,
) -> AppResult<()>
where
    R: AsyncRead + Unpin,
{
    while let Some(payload) = read_frame(reader).await? {
        let frame = match serde_json::from_slice::<Inbound>(&payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, bytes = payload.len(), "Ignoring unparseable frame");
                continue;
            }
        };

        match frame {
            Inbound::Response(response) => host.resolve(response).await,
            Inbound::Event(frame) => {
                debug!(event = ?frame.event, request_id = ?frame.request_id, "Event received");
                command_tx
                    .send(AppCommand::Dispatch {
                        event: frame.event,
                        reply_to: frame.request_id,
                    })
                    .map_err(|e| AppError::ChannelSendFailed {
                        message: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
            }
        }
    }

    info!("Extension closed the connection");
    Ok(())
}

/// Serialize and write outbound frames until every sender is dropped.
///
/// A frame that cannot be encoded is dropped with a warning; an IO failure
/// ends the task since the pipe is gone.
#[instrument(skip_all)]
pub(crate) async fn run_writer<W>(
    mut writer: W,
    mut outbound_rx: mpsc::Receiver<Outbound>,
) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = outbound_rx.recv().await {
        let payload = match serde_json::to_vec(&frame) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to encode outbound frame");
                continue;
            }
        };

        match write_frame(&mut writer, &payload).await {
            Ok(()) => {}
            Err(e @ AppError::Protocol { .. }) => {
                warn!(error = %e, "Dropping outbound frame");
            }
            Err(e) => return Err(e),
        }
    }

    debug!("Outbound channel closed, writer stopping");
    Ok(())
}
