use crate::{CoreResult, DailyActivityLog, Session, User};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything kept in durable local storage.
///
/// No schema versioning: every key is optional on read and an absent key
/// means logged out / empty log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Logged-in user.
    #[serde(default)]
    pub user: Option<User>,
    /// Login flag.
    #[serde(default)]
    pub is_logged_in: bool,
    /// Bearer token from the last token exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Same-day dwell time not yet flushed.
    #[serde(default)]
    pub daily_activity_log: DailyActivityLog,
}

impl PersistedState {
    /// Session view of the persisted keys.
    pub fn session(&self) -> Session {
        match (&self.user, self.is_logged_in) {
            (Some(user), true) => Session::logged_in(user.clone(), self.auth_token.clone()),
            _ => Session::logged_out(),
        }
    }
}

/// Durable key-value storage that survives coordinator restarts.
///
/// Session and activity log are written independently so neither write
/// clobbers the other.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Read everything, tolerating absent keys.
    async fn load(&self) -> CoreResult<PersistedState>;

    /// Write the `user`, `isLoggedIn` and `authToken` keys.
    async fn save_session(&self, session: &Session) -> CoreResult<()>;

    /// Write the `dailyActivityLog` key.
    async fn save_activity_log(&self, log: &DailyActivityLog) -> CoreResult<()>;
}
