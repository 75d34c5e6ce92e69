use crate::{JsonFileStorage, storage::STATE_FILE};

use meetwatch_core::{DailyActivityLog, PersistedState, Session, StateStorage, User};

use std::fs;

use serde_json::{Value, json};
use tempfile::TempDir;

fn ada() -> User {
    User {
        email: "ada@example.com".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        avatar_url: None,
    }
}

#[allow(clippy::unwrap_used)]
fn read_json(dir: &TempDir) -> Value {
    serde_json::from_slice(&fs::read(dir.path().join(STATE_FILE)).unwrap()).unwrap()
}

/// WHAT: A fresh data directory loads as logged out with an empty log
/// WHY: First start has no state file
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_state_file_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::in_dir(dir.path());

    let state = storage.load().await.unwrap();

    assert_eq!(state, PersistedState::default());
}

/// WHAT: Session and activity log writes do not clobber each other
/// WHY: They are saved at different times by different handlers
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_session_then_log_saved_when_loading_then_both_present() {
    // Given: Session saved, then activity log saved
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::in_dir(dir.path());
    let mut log = DailyActivityLog::default();
    log.add("github.com", 120);

    storage
        .save_session(&Session::logged_in(ada(), Some("token-1".to_string())))
        .await
        .unwrap();
    storage.save_activity_log(&log).await.unwrap();

    // When: Loading
    let state = storage.load().await.unwrap();

    // Then: Both halves survive
    assert_eq!(state.user, Some(ada()));
    assert!(state.is_logged_in);
    assert_eq!(state.auth_token.as_deref(), Some("token-1"));
    assert_eq!(state.daily_activity_log, log);
    assert_eq!(state.session(), Session::logged_in(ada(), Some("token-1".to_string())));
}

/// WHAT: The file uses the extension's storage key names
/// WHY: State written by the extension can be read back and vice versa
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_saved_state_when_reading_file_then_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::in_dir(dir.path());
    let mut log = DailyActivityLog::default();
    log.add("meet.google.com", 60);

    storage
        .save_session(&Session::logged_in(ada(), None))
        .await
        .unwrap();
    storage.save_activity_log(&log).await.unwrap();

    let json = read_json(&dir);
    assert_eq!(json["isLoggedIn"], true);
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["firstName"], "Ada");
    assert_eq!(json["dailyActivityLog"], json!({"meet.google.com": 60}));
    assert!(json.get("authToken").is_none());
}

/// WHAT: Logging out removes the user and token keys
/// WHY: A logged-out profile must not keep credentials on disk
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_logged_in_state_when_saving_logged_out_then_keys_removed() {
    // Given: Logged in with a token and some activity
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::in_dir(dir.path());
    let mut log = DailyActivityLog::default();
    log.add("github.com", 30);
    storage
        .save_session(&Session::logged_in(ada(), Some("token-1".to_string())))
        .await
        .unwrap();
    storage.save_activity_log(&log).await.unwrap();

    // When: Saving a logged-out session
    storage.save_session(&Session::logged_out()).await.unwrap();

    // Then: Credentials gone, log kept
    let json = read_json(&dir);
    assert!(json.get("user").is_none());
    assert!(json.get("authToken").is_none());
    assert_eq!(json["isLoggedIn"], false);
    assert_eq!(storage.load().await.unwrap().daily_activity_log, log);
}

/// WHAT: A corrupt file loads as defaults and is replaced on the next write
/// WHY: A torn write from an older build must not brick the host
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_corrupt_file_when_loading_then_defaults() {
    // Given: Garbage on disk
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STATE_FILE), b"{not json").unwrap();
    let storage = JsonFileStorage::in_dir(dir.path());

    // When: Loading, then saving
    let state = storage.load().await.unwrap();
    storage.save_session(&Session::logged_out()).await.unwrap();

    // Then: Defaults, and the file is valid again
    assert_eq!(state, PersistedState::default());
    assert_eq!(read_json(&dir)["isLoggedIn"], false);
}

/// WHAT: One malformed key does not discard the others
/// WHY: Losing the session over a bad log entry would force a re-login
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_malformed_log_key_when_loading_then_session_kept() {
    // Given: Valid session, log with the wrong type
    let dir = TempDir::new().unwrap();
    let raw = json!({
        "user": {"email": "ada@example.com"},
        "isLoggedIn": true,
        "dailyActivityLog": ["github.com"]
    });
    fs::write(dir.path().join(STATE_FILE), raw.to_string()).unwrap();
    let storage = JsonFileStorage::in_dir(dir.path());

    // When: Loading
    let state = storage.load().await.unwrap();

    // Then: Session intact, log empty
    assert_eq!(state.user, Some(User::with_email("ada@example.com")));
    assert!(state.is_logged_in);
    assert!(state.daily_activity_log.is_empty());
}

/// WHAT: Writes create a missing data directory
/// WHY: The data directory may be removed while the host runs
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_missing_parent_dir_when_saving_then_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("profile").join(STATE_FILE);
    let storage = JsonFileStorage::new(&nested);

    storage.save_session(&Session::logged_out()).await.unwrap();

    assert!(nested.exists());
    assert!(!nested.with_extension("tmp").exists());
}
