use crate::{
    AppCommand,
    native_messaging::{MAX_FRAME_BYTES, NativeHost, Outbound, RelayTarget, read_frame, run_reader, run_writer},
};

use meetwatch_core::{HostEvent, RelayMessage, TabId};

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use tokio::sync::mpsc;

fn framed(value: &Value) -> Vec<u8> {
    let payload = value.to_string().into_bytes();
    let mut bytes = (payload.len() as u32).to_ne_bytes().to_vec();
    bytes.extend(payload);
    bytes
}

/// WHAT: Events become dispatch commands and EOF ends with a shutdown
/// WHY: The coordinator only ever sees commands, never raw frames
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_event_frames_when_reading_then_dispatched_then_shutdown() {
    // Given: Popup request, garbage, a stray response, a tab event
    let mut input = framed(&json!({
        "type": "event", "requestId": 1, "kind": "message", "message": {"action": "getStatus"}
    }));
    input.extend(framed(&json!({"type": "bogus"})));
    input.extend(framed(&json!({"type": "response", "id": 42, "ok": true})));
    input.extend(framed(&json!({"type": "event", "kind": "tabRemoved", "tabId": 4})));

    let (outbound_tx, _outbound_rx) = mpsc::channel(8);
    let host = Arc::new(NativeHost::new(outbound_tx, Duration::from_secs(5)));
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();

    // When: Reading to the end
    run_reader(input.as_slice(), host, command_tx).await.unwrap();

    // Then: Two dispatches in order, then shutdown
    assert!(matches!(
        command_rx.recv().await,
        Some(AppCommand::Dispatch {
            event: HostEvent::Message { message: RelayMessage::GetStatus },
            reply_to: Some(1),
        })
    ));
    assert!(matches!(
        command_rx.recv().await,
        Some(AppCommand::Dispatch {
            event: HostEvent::TabRemoved { tab_id: TabId(4) },
            reply_to: None,
        })
    ));
    assert!(matches!(command_rx.recv().await, Some(AppCommand::Shutdown)));
}

/// WHAT: An oversized inbound frame is skipped and reading carries on
/// WHY: The host must outlive one bad message from the extension
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_oversized_frame_when_reading_then_skipped_and_next_event_dispatched() {
    // Given: An oversized frame followed by a tab event
    let mut input = ((MAX_FRAME_BYTES + 1) as u32).to_ne_bytes().to_vec();
    input.extend(vec![b' '; MAX_FRAME_BYTES + 1]);
    input.extend(framed(&json!({"type": "event", "kind": "tabRemoved", "tabId": 4})));
    let (outbound_tx, _outbound_rx) = mpsc::channel(8);
    let host = Arc::new(NativeHost::new(outbound_tx, Duration::from_secs(5)));
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();

    // When: Reading to the end
    run_reader(input.as_slice(), host, command_tx).await.unwrap();

    // Then: The tab event is dispatched, then shutdown
    assert!(matches!(
        command_rx.recv().await,
        Some(AppCommand::Dispatch {
            event: HostEvent::TabRemoved { tab_id: TabId(4) },
            reply_to: None,
        })
    ));
    assert!(matches!(command_rx.recv().await, Some(AppCommand::Shutdown)));
}

/// WHAT: A protocol error still shuts the app down
/// WHY: A broken pipe means the extension is gone
#[tokio::test]
async fn given_truncated_frame_when_reading_then_error_and_shutdown() {
    // Given: Header for 10 bytes, only 3 present
    let mut input = 10u32.to_ne_bytes().to_vec();
    input.extend_from_slice(b"abc");
    let (outbound_tx, _outbound_rx) = mpsc::channel(8);
    let host = Arc::new(NativeHost::new(outbound_tx, Duration::from_secs(5)));
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();

    // When: Reading
    let result = run_reader(input.as_slice(), host, command_tx).await;

    // Then: Error, and shutdown requested
    assert!(result.is_err());
    assert!(matches!(command_rx.recv().await, Some(AppCommand::Shutdown)));
}

/// WHAT: The writer frames each message and skips ones over the limit
/// WHY: One huge audio chunk must not kill the connection
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_outbound_frames_when_writing_then_framed_and_oversized_skipped() {
    // Given: Small relay, oversized relay, small relay
    let (mut ours, theirs) = tokio::io::duplex(64 * 1024);
    let (tx, rx) = mpsc::channel(8);
    tx.send(Outbound::Relay {
        target: RelayTarget::Offscreen,
        message: RelayMessage::StopOffscreenCapture,
    })
    .await
    .unwrap();
    tx.send(Outbound::Relay {
        target: RelayTarget::Offscreen,
        message: RelayMessage::AudioChunk {
            chunk: "A".repeat(MAX_FRAME_BYTES),
        },
    })
    .await
    .unwrap();
    tx.send(Outbound::Relay {
        target: RelayTarget::Offscreen,
        message: RelayMessage::RecordingStopped,
    })
    .await
    .unwrap();
    drop(tx);

    // When: Writer drains the channel
    run_writer(theirs, rx).await.unwrap();

    // Then: Only the two small frames arrive
    let first: Value = serde_json::from_slice(&read_frame(&mut ours).await.unwrap().unwrap()).unwrap();
    let second: Value = serde_json::from_slice(&read_frame(&mut ours).await.unwrap().unwrap()).unwrap();
    assert_eq!(first["message"]["action"], "stopOffscreenCapture");
    assert_eq!(second["message"]["action"], "recordingStopped");
    assert!(read_frame(&mut ours).await.unwrap().is_none());
}
