use crate::{ActivityEntry, CoreResult, User};

use async_trait::async_trait;
use chrono::NaiveDate;

/// Who a backend request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User identifier sent as `userId` (the account email).
    pub user_id: String,
    /// Bearer token returned by the token exchange, when the backend issues one.
    pub token: Option<String>,
}

/// Successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthExchange {
    /// The logged-in user.
    pub user: User,
    /// Optional bearer token for later requests.
    pub token: Option<String>,
}

/// Backend HTTP endpoints used by the coordinator.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /auth/google/callback`. Returns [`CoreError::Auth`](crate::CoreError::Auth)
    /// when the backend answers `success: false`.
    async fn exchange_auth_code(&self, code: &str, redirect_uri: &str) -> CoreResult<AuthExchange>;

    /// `POST /audio/stream` with one base64 encoded chunk.
    async fn stream_chunk(
        &self,
        identity: &Identity,
        recording_id: &str,
        chunk: &str,
    ) -> CoreResult<()>;

    /// `POST /audio/stream/end`.
    async fn end_stream(
        &self,
        identity: &Identity,
        recording_id: &str,
        reason: &str,
    ) -> CoreResult<()>;

    /// `POST /activity/log` with one day's aggregated dwell time.
    async fn post_activity_log(
        &self,
        identity: &Identity,
        date: NaiveDate,
        activity: &[ActivityEntry],
    ) -> CoreResult<()>;
}
