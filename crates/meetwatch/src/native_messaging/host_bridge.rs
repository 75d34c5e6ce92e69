//! Browser, audio surface and popup access over the native messaging pipe.
//!
//! Every host call is written as an [`Outbound::Call`] with a fresh id and
//! parked until the reader task hands back the matching [`CallResponse`].

use crate::native_messaging::{CallResponse, HostCall, Outbound, RelayTarget};

use meetwatch_core::{
    AudioSurface, BrowserHost, CoreError, CoreResult, DeliveryError, RelayMessage, StatusSink,
    StatusSnapshot, Tab, TabId,
};

use std::{
    collections::HashMap,
    panic::Location,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, instrument, warn};

pub(crate) const OFFSCREEN_DOCUMENT_URL: &str = "offscreen.html";
const OFFSCREEN_REASON: &str = "USER_MEDIA";
const OFFSCREEN_JUSTIFICATION: &str = "Recording meeting tab audio for transcription";

/// The consent screen waits on the user.
pub(crate) const AUTH_FLOW_TIMEOUT: Duration = Duration::from_secs(300);

/// Browser error text when no popup is listening.
pub(crate) const NO_RECEIVER_ERROR: &str = "Receiving end does not exist";

/// Client side of the extension shim.
pub(crate) struct NativeHost {
    outbound: mpsc::Sender<Outbound>,
    pending: Mutex<HashMap<u64, oneshot::Sender<CallResponse>>>,
    next_id: AtomicU64,
    call_timeout: Duration,
}

impl NativeHost {
    pub(crate) fn new(outbound: mpsc::Sender<Outbound>, call_timeout: Duration) -> Self {
        Self {
            outbound,
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            call_timeout,
        }
    }

    /// Queue a frame for the writer task.
    pub(crate) async fn send(&self, frame: Outbound) -> CoreResult<()> {
        self.outbound.send(frame).await.map_err(|_| CoreError::Host {
            reason: "Extension connection closed".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Hand a response to the call waiting for it.
    #[instrument(skip(self, response), fields(id = response.id, ok = response.ok))]
    pub(crate) async fn resolve(&self, response: CallResponse) {
        let waiter = self.pending.lock().await.remove(&response.id);
        match waiter {
            Some(tx) => {
                if tx.send(response).is_err() {
                    debug!("Caller gave up before the response arrived");
                }
            }
            None => warn!("Response for unknown or expired call"),
        }
    }

    /// Fail every outstanding call. Used when the extension disconnects.
    pub(crate) async fn fail_pending(&self) {
        let mut pending = self.pending.lock().await;
        if !pending.is_empty() {
            warn!(count = pending.len(), "Dropping calls pending on a closed connection");
        }
        pending.clear();
    }

    #[cfg(test)]
    pub(crate) async fn pending_calls(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn call(&self, call: HostCall) -> CoreResult<Value> {
        self.call_with_timeout(call, self.call_timeout).await
    }

    async fn call_with_timeout(&self, call: HostCall, timeout: Duration) -> CoreResult<Value> {
        let method = method_name(&call);
        let response = self.call_raw(call, timeout).await?;

        if response.ok {
            Ok(response.data)
        } else {
            Err(CoreError::Host {
                reason: format!(
                    "{} failed: {}",
                    method,
                    response.error.as_deref().unwrap_or("unknown error")
                ),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    /// Send a call and wait for its response without interpreting `ok`.
    async fn call_raw(&self, call: HostCall, timeout: Duration) -> CoreResult<CallResponse> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let method = method_name(&call);
        let (tx, rx) = oneshot::channel();

        // Registered before sending so a fast response cannot miss it.
        self.pending.lock().await.insert(id, tx);

        if let Err(e) = self.send(Outbound::Call { id, call }).await {
            self.pending.lock().await.remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(CoreError::Host {
                reason: format!("{} abandoned: extension disconnected", method),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(CoreError::Host {
                    reason: format!("{} timed out after {}s", method, timeout.as_secs()),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }
}

#[async_trait]
impl BrowserHost for NativeHost {
    async fn active_tab(&self) -> CoreResult<Option<Tab>> {
        decode("queryActiveTab", self.call(HostCall::QueryActiveTab).await?)
    }

    async fn get_tab(&self, tab_id: TabId) -> CoreResult<Tab> {
        decode("getTab", self.call(HostCall::GetTab { tab_id }).await?)
    }

    async fn tab_media_stream_id(&self, tab_id: TabId) -> CoreResult<String> {
        let data = self
            .call(HostCall::GetMediaStreamId {
                target_tab_id: tab_id,
            })
            .await?;
        decode("getMediaStreamId", data)
    }

    async fn set_badge(&self, tab_id: TabId, text: &str) -> CoreResult<()> {
        self.call(HostCall::SetBadgeText {
            tab_id,
            text: text.to_string(),
        })
        .await
        .map(|_| ())
    }

    async fn redirect_url(&self) -> CoreResult<String> {
        decode("getRedirectUrl", self.call(HostCall::GetRedirectUrl).await?)
    }

    async fn launch_web_auth_flow(&self, url: &str) -> CoreResult<Option<String>> {
        let data = self
            .call_with_timeout(
                HostCall::LaunchWebAuthFlow {
                    url: url.to_string(),
                    interactive: true,
                },
                AUTH_FLOW_TIMEOUT,
            )
            .await?;
        decode("launchWebAuthFlow", data)
    }
}

#[async_trait]
impl AudioSurface for NativeHost {
    async fn exists(&self) -> CoreResult<bool> {
        decode(
            "hasOffscreenDocument",
            self.call(HostCall::HasOffscreenDocument).await?,
        )
    }

    async fn create(&self) -> CoreResult<()> {
        self.call(HostCall::CreateOffscreenDocument {
            url: OFFSCREEN_DOCUMENT_URL.to_string(),
            reasons: vec![OFFSCREEN_REASON.to_string()],
            justification: OFFSCREEN_JUSTIFICATION.to_string(),
        })
        .await
        .map(|_| ())
    }

    async fn close(&self) -> CoreResult<()> {
        self.call(HostCall::CloseOffscreenDocument).await.map(|_| ())
    }

    async fn relay(&self, message: RelayMessage) -> CoreResult<()> {
        self.send(Outbound::Relay {
            target: RelayTarget::Offscreen,
            message,
        })
        .await
    }
}

#[async_trait]
impl StatusSink for NativeHost {
    async fn deliver(&self, status: &StatusSnapshot) -> Result<(), DeliveryError> {
        let call = HostCall::NotifyPopup {
            message: RelayMessage::UpdatePopupStatus {
                status: status.clone(),
            },
        };

        let response = self
            .call_raw(call, self.call_timeout)
            .await
            .map_err(|e| DeliveryError::Failed(e.user_message()))?;

        match (response.ok, response.error) {
            (true, _) => Ok(()),
            (false, Some(error)) if error.contains(NO_RECEIVER_ERROR) => {
                Err(DeliveryError::NoReceiver)
            }
            (false, error) => Err(DeliveryError::Failed(
                error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

#[track_caller]
fn decode<T: DeserializeOwned>(method: &str, data: Value) -> CoreResult<T> {
    serde_json::from_value(data).map_err(|e| CoreError::Host {
        reason: format!("Unexpected {} result: {}", method, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn method_name(call: &HostCall) -> &'static str {
    match call {
        HostCall::QueryActiveTab => "queryActiveTab",
        HostCall::GetTab { .. } => "getTab",
        HostCall::GetMediaStreamId { .. } => "getMediaStreamId",
        HostCall::SetBadgeText { .. } => "setBadgeText",
        HostCall::GetRedirectUrl => "getRedirectUrl",
        HostCall::LaunchWebAuthFlow { .. } => "launchWebAuthFlow",
        HostCall::HasOffscreenDocument => "hasOffscreenDocument",
        HostCall::CreateOffscreenDocument { .. } => "createOffscreenDocument",
        HostCall::CloseOffscreenDocument => "closeOffscreenDocument",
        HostCall::NotifyPopup { .. } => "notifyPopup",
    }
}
