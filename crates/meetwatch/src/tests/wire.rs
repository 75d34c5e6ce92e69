use crate::native_messaging::{CallResponse, EventFrame, HostCall, Inbound, Outbound, RelayTarget};

use meetwatch_core::{AlarmKind, HostEvent, RelayMessage, RelayResponse, StatusSnapshot, TabId};

use serde_json::json;

/// WHAT: Popup request frames carry the event and its request id
/// WHY: The reply must be routed back to the waiting popup
#[test]
#[allow(clippy::unwrap_used)]
fn given_popup_request_json_when_parsing_then_event_and_request_id() {
    // Given: startCapture request from the popup
    let raw = json!({
        "type": "event",
        "requestId": 12,
        "kind": "message",
        "message": {"action": "startCapture", "tabId": 7}
    });

    // When: Parsing
    let inbound: Inbound = serde_json::from_value(raw).unwrap();

    // Then: Event frame with id
    assert_eq!(
        inbound,
        Inbound::Event(EventFrame {
            request_id: Some(12),
            event: HostEvent::Message {
                message: RelayMessage::StartCapture { tab_id: TabId(7) },
            },
        })
    );
}

/// WHAT: Browser events parse without a request id
/// WHY: Tab and window listeners never expect a reply
#[test]
#[allow(clippy::unwrap_used)]
fn given_tab_update_json_when_parsing_then_no_request_id() {
    // Given: Tab URL change
    let raw = json!({
        "type": "event",
        "kind": "tabUpdated",
        "tabId": 3,
        "url": "https://meet.google.com/abc-defg-hij"
    });

    // When: Parsing
    let inbound: Inbound = serde_json::from_value(raw).unwrap();

    // Then: No id, URL kept
    assert_eq!(
        inbound,
        Inbound::Event(EventFrame {
            request_id: None,
            event: HostEvent::TabUpdated {
                tab_id: TabId(3),
                url: Some("https://meet.google.com/abc-defg-hij".to_string()),
            },
        })
    );
}

/// WHAT: Call responses parse with optional data and error
/// WHY: Void browser APIs answer with no data at all
#[test]
#[allow(clippy::unwrap_used)]
fn given_failed_response_json_when_parsing_then_error_kept() {
    // Given: Failure without data
    let raw = json!({"type": "response", "id": 4, "ok": false, "error": "No tab with id: 9"});

    // When: Parsing
    let inbound: Inbound = serde_json::from_value(raw).unwrap();

    // Then: Null data, error text
    assert_eq!(
        inbound,
        Inbound::Response(CallResponse {
            id: 4,
            ok: false,
            data: serde_json::Value::Null,
            error: Some("No tab with id: 9".to_string()),
        })
    );
}

/// WHAT: Host calls serialize with a method tag and camelCase fields
/// WHY: The extension shim dispatches on these names
#[test]
#[allow(clippy::unwrap_used)]
fn given_host_call_when_serializing_then_method_tagged() {
    // Given: Stream id call
    let frame = Outbound::Call {
        id: 5,
        call: HostCall::GetMediaStreamId {
            target_tab_id: TabId(7),
        },
    };

    // When: Serializing
    let json = serde_json::to_value(&frame).unwrap();

    // Then: Nested method tag
    assert_eq!(
        json,
        json!({"type": "call", "id": 5, "call": {"method": "getMediaStreamId", "targetTabId": 7}})
    );
}

/// WHAT: Relay and reply frames carry their payloads unchanged
/// WHY: The offscreen document and popup parse the inner message themselves
#[test]
#[allow(clippy::unwrap_used)]
fn given_relay_and_reply_when_serializing_then_payloads_nested() {
    // Given: Stop relay and a status reply
    let relay = Outbound::Relay {
        target: RelayTarget::Offscreen,
        message: RelayMessage::StopOffscreenCapture,
    };
    let reply = Outbound::Reply {
        reply_to: 12,
        response: RelayResponse::ok(StatusSnapshot::default()),
    };

    // When: Serializing
    let relay = serde_json::to_value(&relay).unwrap();
    let reply = serde_json::to_value(&reply).unwrap();

    // Then: Expected envelopes
    assert_eq!(
        relay,
        json!({"type": "relay", "target": "offscreen", "message": {"action": "stopOffscreenCapture"}})
    );
    assert_eq!(reply["type"], "reply");
    assert_eq!(reply["replyTo"], 12);
    assert_eq!(reply["response"]["success"], true);
    assert_eq!(reply["response"]["status"]["loggedIn"], false);
}

/// WHAT: Alarm events use the camelCase alarm names
/// WHY: Test harnesses and the shim may inject alarms too
#[test]
#[allow(clippy::unwrap_used)]
fn given_alarm_json_when_parsing_then_alarm_kind() {
    let raw = json!({"type": "event", "kind": "alarm", "alarm": "dailyFlush"});

    let inbound: Inbound = serde_json::from_value(raw).unwrap();

    assert_eq!(
        inbound,
        Inbound::Event(EventFrame {
            request_id: None,
            event: HostEvent::Alarm {
                alarm: AlarmKind::DailyFlush
            },
        })
    );
}
