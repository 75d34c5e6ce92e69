//! Durable coordinator state in a JSON file under the data directory.
//!
//! The file is a flat object keyed like the extension's local storage
//! (`user`, `isLoggedIn`, `authToken`, `dailyActivityLog`). Each key is read
//! independently so one bad value does not discard the rest.

use meetwatch_core::{
    CoreError, CoreResult, DailyActivityLog, PersistedState, Session, StateStorage, User,
};

use std::{
    io::ErrorKind,
    panic::Location,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, instrument, warn};

pub(crate) const STATE_FILE: &str = "state.json";

const USER_KEY: &str = "user";
const LOGGED_IN_KEY: &str = "isLoggedIn";
const AUTH_TOKEN_KEY: &str = "authToken";
const ACTIVITY_LOG_KEY: &str = "dailyActivityLog";

/// [`StateStorage`] backed by a single JSON file.
pub struct JsonFileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonFileStorage {
    /// Storage at `path`. Nothing is touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage in `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STATE_FILE))
    }

    async fn read_map(&self) -> CoreResult<Map<String, Value>> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(CoreError::Storage {
                    reason: format!("Failed to read {}: {}", self.path.display(), e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        match serde_json::from_slice::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(path = ?self.path, "State file is corrupt, starting from defaults");
                Ok(Map::new())
            }
        }
    }

    async fn write_map(&self, map: Map<String, Value>) -> CoreResult<()> {
        let storage_error = |e: std::io::Error| CoreError::Storage {
            reason: format!("Failed to write {}: {}", self.path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        };

        let contents = serde_json::to_vec_pretty(&Value::Object(map)).map_err(|e| {
            CoreError::Storage {
                reason: format!("Failed to encode state: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_error)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut temp_file = fs::File::create(&temp_path).await.map_err(storage_error)?;
        temp_file.write_all(&contents).await.map_err(storage_error)?;
        temp_file.sync_all().await.map_err(storage_error)?;
        drop(temp_file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(storage_error)?;

        debug!(path = ?self.path, bytes = contents.len(), "State written");
        Ok(())
    }

    #[track_caller]
    fn encode<T: serde::Serialize>(key: &str, value: &T) -> CoreResult<Value> {
        serde_json::to_value(value).map_err(|e| CoreError::Storage {
            reason: format!("Failed to encode {}: {}", key, e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[async_trait]
impl StateStorage for JsonFileStorage {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn load(&self) -> CoreResult<PersistedState> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;

        Ok(PersistedState {
            user: take_key::<Option<User>>(&mut map, USER_KEY).flatten(),
            is_logged_in: take_key(&mut map, LOGGED_IN_KEY).unwrap_or(false),
            auth_token: take_key::<Option<String>>(&mut map, AUTH_TOKEN_KEY).flatten(),
            daily_activity_log: take_key(&mut map, ACTIVITY_LOG_KEY).unwrap_or_default(),
        })
    }

    #[instrument(skip(self, session), fields(logged_in = session.is_logged_in()))]
    async fn save_session(&self, session: &Session) -> CoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;

        match session.user() {
            Some(user) => {
                map.insert(USER_KEY.to_string(), Self::encode(USER_KEY, user)?);
            }
            None => {
                map.remove(USER_KEY);
            }
        }
        map.insert(
            LOGGED_IN_KEY.to_string(),
            Value::Bool(session.is_logged_in()),
        );
        match session.auth_token() {
            Some(token) => {
                map.insert(AUTH_TOKEN_KEY.to_string(), Value::String(token.to_string()));
            }
            None => {
                map.remove(AUTH_TOKEN_KEY);
            }
        }

        self.write_map(map).await
    }

    #[instrument(skip(self, log), fields(domains = log.len()))]
    async fn save_activity_log(&self, log: &DailyActivityLog) -> CoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;

        map.insert(
            ACTIVITY_LOG_KEY.to_string(),
            Self::encode(ACTIVITY_LOG_KEY, log)?,
        );

        self.write_map(map).await
    }
}

/// Decode one key, warning and yielding `None` when the value is malformed.
fn take_key<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed stored value");
            None
        }
    }
}
