//! Browser native messaging framing: a 4-byte native-endian length followed
//! by that many bytes of UTF-8 JSON.

use crate::{AppError, AppResult};

use std::{io::ErrorKind, panic::Location};

use error_location::ErrorLocation;
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// Largest frame accepted in either direction.
pub(crate) const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Read one frame. Returns `None` on a clean end of stream before a header.
///
/// Frames announcing more than [`MAX_FRAME_BYTES`] are drained without being
/// buffered and the next frame is read instead.
pub(crate) async fn read_frame<R>(reader: &mut R) -> AppResult<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    loop {
        let mut header = [0u8; 4];
        match reader.read_exact(&mut header).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_ne_bytes(header) as usize;
        if len > MAX_FRAME_BYTES {
            let skipped = io::copy(&mut (&mut *reader).take(len as u64), &mut io::sink()).await?;
            if skipped < len as u64 {
                return Err(truncated(len));
            }
            warn!(bytes = len, limit = MAX_FRAME_BYTES, "Skipped oversized frame");
            continue;
        }

        let mut payload = vec![0u8; len];
        return match reader.read_exact(&mut payload).await {
            Ok(_) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(truncated(len)),
            Err(e) => Err(e.into()),
        };
    }
}

#[track_caller]
fn truncated(len: usize) -> AppError {
    AppError::Protocol {
        reason: format!("Stream ended inside a {} byte frame", len),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Write one frame and flush it.
pub(crate) async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|len| *len as usize <= MAX_FRAME_BYTES)
        .ok_or_else(|| AppError::Protocol {
            reason: format!(
                "Outgoing frame of {} bytes exceeds {} byte limit",
                payload.len(),
                MAX_FRAME_BYTES
            ),
            location: ErrorLocation::from(Location::caller()),
        })?;

    writer.write_all(&len.to_ne_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;

    Ok(())
}
