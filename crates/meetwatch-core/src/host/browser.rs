use crate::CoreResult;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl From<i64> for TabId {
    fn from(id: i64) -> Self {
        TabId(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The slice of a browser tab the coordinator cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Tab identifier.
    pub id: TabId,
    /// Current URL. Absent for tabs the extension may not inspect.
    #[serde(default)]
    pub url: Option<String>,
}

/// Browser APIs the coordinator calls.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Active tab of the last focused window, if any.
    async fn active_tab(&self) -> CoreResult<Option<Tab>>;

    /// Look up a tab by id.
    async fn get_tab(&self, tab_id: TabId) -> CoreResult<Tab>;

    /// Acquire a tab-scoped media stream handle for capture.
    async fn tab_media_stream_id(&self, tab_id: TabId) -> CoreResult<String>;

    /// Set the badge text shown on a tab. An empty string clears it.
    async fn set_badge(&self, tab_id: TabId, text: &str) -> CoreResult<()>;

    /// Redirect URI registered for the extension's web auth flow.
    async fn redirect_url(&self) -> CoreResult<String>;

    /// Run the interactive web auth flow. `None` means the user cancelled.
    async fn launch_web_auth_flow(&self, url: &str) -> CoreResult<Option<String>>;
}
