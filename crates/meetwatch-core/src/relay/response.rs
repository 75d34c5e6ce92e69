use crate::{CoreError, StatusSnapshot};

use serde::{Deserialize, Serialize};

/// Reply to a popup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Status after handling the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusSnapshot>,
}

impl RelayResponse {
    /// Success carrying the current status.
    pub fn ok(status: StatusSnapshot) -> Self {
        Self {
            success: true,
            error: None,
            status: Some(status),
        }
    }

    /// Failure with the error's user-facing message and the current status.
    pub fn failure(error: &CoreError, status: StatusSnapshot) -> Self {
        Self {
            success: false,
            error: Some(error.user_message()),
            status: Some(status),
        }
    }
}
