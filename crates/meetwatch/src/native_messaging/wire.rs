//! JSON envelopes exchanged with the extension shim.

use meetwatch_core::{HostEvent, RelayMessage, RelayResponse, TabId};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frame sent by the extension.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    /// A browser event or relay message for the coordinator.
    Event(EventFrame),
    /// The outcome of an earlier [`Outbound::Call`].
    Response(CallResponse),
}

/// Host event plus the popup request id to answer, if any.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrame {
    /// Set when the popup awaits a [`RelayResponse`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    /// The event itself.
    #[serde(flatten)]
    pub event: HostEvent,
}

/// Result of a host call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CallResponse {
    /// Correlation id of the call.
    pub id: u64,
    /// Whether the browser API succeeded.
    pub ok: bool,
    /// Return value of the browser API.
    #[serde(default)]
    pub data: Value,
    /// Browser error message (`chrome.runtime.lastError`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Frame sent to the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outbound {
    /// Ask the extension to run a browser API and answer with a response.
    Call {
        /// Correlation id echoed in the response.
        id: u64,
        /// What to run.
        call: HostCall,
    },
    /// One-way relay to another extension context.
    Relay {
        /// Receiving context.
        target: RelayTarget,
        /// Message to deliver.
        message: RelayMessage,
    },
    /// Answer to a popup request.
    Reply {
        /// Request id from the [`EventFrame`].
        reply_to: u64,
        /// The answer.
        response: RelayResponse,
    },
}

/// Extension contexts that can receive relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelayTarget {
    /// The offscreen audio document.
    Offscreen,
}

/// Browser APIs the extension runs on the coordinator's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCall {
    /// `tabs.query({active: true, lastFocusedWindow: true})`; data is a tab or null.
    QueryActiveTab,
    /// `tabs.get(tabId)`; data is a tab.
    GetTab {
        /// Tab to look up.
        tab_id: TabId,
    },
    /// `tabCapture.getMediaStreamId({targetTabId})`; data is the stream id.
    GetMediaStreamId {
        /// Tab to capture.
        target_tab_id: TabId,
    },
    /// `action.setBadgeText({tabId, text})`.
    SetBadgeText {
        /// Tab whose badge changes.
        tab_id: TabId,
        /// Badge text, empty to clear.
        text: String,
    },
    /// `identity.getRedirectURL()`; data is the URL.
    GetRedirectUrl,
    /// `identity.launchWebAuthFlow({url, interactive})`; data is the final
    /// redirect URL, or null when the user closed the window.
    LaunchWebAuthFlow {
        /// Authorization URL.
        url: String,
        /// Whether the user may interact.
        interactive: bool,
    },
    /// `offscreen.hasDocument()`; data is a bool.
    HasOffscreenDocument,
    /// `offscreen.createDocument({url, reasons, justification})`.
    CreateOffscreenDocument {
        /// Extension page to load.
        url: String,
        /// Offscreen reasons.
        reasons: Vec<String>,
        /// Justification shown to the browser.
        justification: String,
    },
    /// `offscreen.closeDocument()`.
    CloseOffscreenDocument,
    /// `runtime.sendMessage(message)` to the popup. Fails with "Receiving end
    /// does not exist" when the popup is closed.
    NotifyPopup {
        /// Message to deliver.
        message: RelayMessage,
    },
}
