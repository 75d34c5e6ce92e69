use crate::config::{
    default_base_url, default_host_call_timeout_secs, default_request_timeout_secs,
};

use serde::{Deserialize, Serialize};

/// Backend service and transport timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the backend endpoints are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long to wait for the extension to answer a host call.
    #[serde(default = "default_host_call_timeout_secs")]
    pub host_call_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            host_call_timeout_secs: default_host_call_timeout_secs(),
        }
    }
}
