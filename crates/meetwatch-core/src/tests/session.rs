use crate::{
    CoreError, OAuthSettings, PersistedState, SessionStore, User,
    session::extract_authorization_code,
    tests::fakes::{Harness, REDIRECT_URI, TEST_EMAIL, test_user},
};

fn oauth() -> OAuthSettings {
    Harness::settings().oauth
}

/// WHAT: Successful login stores the exchanged user and persists it
/// WHY: Session must survive a coordinator restart
#[tokio::test]
async fn given_auth_flow_returns_code_when_logging_in_then_session_persisted() {
    // Given: Auth flow that redirects with a code
    let harness = Harness::new();
    let mut store = SessionStore::default();

    // When: Logging in
    let result = store.login(&oauth(), &harness.collaborators).await;

    // Then: User is logged in in memory and in storage
    assert!(matches!(result, Ok(ref user) if user.email == TEST_EMAIL));
    let (logged_in, user) = store.status();
    assert!(logged_in);
    assert_eq!(user, Some(&test_user()));

    let persisted = harness.storage.state();
    assert!(persisted.is_logged_in);
    assert_eq!(persisted.user, Some(test_user()));
    assert_eq!(persisted.auth_token.as_deref(), Some("token-123"));
}

/// WHAT: The code and redirect URI are handed to the backend exchange
/// WHY: The backend must redeem the code against the same redirect URI
#[tokio::test]
async fn given_auth_flow_when_logging_in_then_code_exchanged_with_redirect_uri() {
    // Given: Default harness
    let harness = Harness::new();
    let mut store = SessionStore::default();

    // When: Logging in
    let _ = store.login(&oauth(), &harness.collaborators).await;

    // Then: Exchange received the code and the redirect URI
    assert_eq!(
        harness.backend.exchanged_codes(),
        vec![("auth-code-1".to_string(), REDIRECT_URI.to_string())]
    );
}

/// WHAT: The launched authorization URL asks for an offline code
/// WHY: The backend needs a refresh token for calendar access
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_client_id_when_logging_in_then_authorization_url_requests_offline_code() {
    // Given: Configured client id
    let harness = Harness::new();
    let mut store = SessionStore::default();

    // When: Logging in
    let _ = store.login(&oauth(), &harness.collaborators).await;

    // Then: Exactly one flow was launched with the expected parameters
    let urls = harness.browser.auth_urls.lock().unwrap().clone();
    assert_eq!(urls.len(), 1);
    let url = url::Url::parse(&urls[0]).unwrap();
    let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(params.contains(&("response_type".to_string(), "code".to_string())));
    assert!(params.contains(&("access_type".to_string(), "offline".to_string())));
    assert!(params.contains(&("prompt".to_string(), "consent".to_string())));
    assert!(params.contains(&("redirect_uri".to_string(), REDIRECT_URI.to_string())));
    assert!(
        params
            .iter()
            .any(|(k, v)| k == "scope" && v.contains("openid") && v.contains("calendar"))
    );
}

/// WHAT: Cancelling the auth window fails login and leaves the user logged out
/// WHY: A dismissed consent screen is a normal user action
#[tokio::test]
async fn given_user_cancels_auth_flow_when_logging_in_then_auth_error_and_logged_out() {
    // Given: Auth flow that returns no redirect
    let harness = Harness::new();
    harness.set_auth_redirect(None);
    let mut store = SessionStore::default();

    // When: Logging in
    let result = store.login(&oauth(), &harness.collaborators).await;

    // Then: Auth error, nothing exchanged, logged-out state persisted
    assert!(matches!(result, Err(CoreError::Auth { .. })));
    assert!(!store.session().is_logged_in());
    assert!(harness.backend.exchanged_codes().is_empty());
    assert!(!harness.storage.state().is_logged_in);
}

/// WHAT: A provider error in the redirect fails login
/// WHY: Denied consent must not reach the token exchange
#[tokio::test]
async fn given_redirect_with_provider_error_when_logging_in_then_auth_error() {
    // Given: Redirect carrying error=access_denied
    let harness = Harness::new();
    let redirect = format!("{}?error=access_denied", REDIRECT_URI);
    harness.set_auth_redirect(Some(&redirect));
    let mut store = SessionStore::default();

    // When: Logging in
    let result = store.login(&oauth(), &harness.collaborators).await;

    // Then: Auth error mentioning the provider error
    assert!(matches!(
        result,
        Err(CoreError::Auth { ref reason, .. }) if reason.contains("access_denied")
    ));
    assert!(harness.backend.exchanged_codes().is_empty());
}

/// WHAT: Backend rejection of the code resets an existing session
/// WHY: A failed re-login must not leave a stale identity behind
#[tokio::test]
async fn given_logged_in_session_when_exchange_rejected_then_session_reset() {
    // Given: Previously logged-in store and a backend that rejects the code
    let harness = Harness::new();
    harness.seed_logged_in();
    let mut store = SessionStore::default();
    store.load(&harness.storage.state());
    harness
        .backend
        .reject_auth
        .store(true, std::sync::atomic::Ordering::SeqCst);

    // When: Logging in again
    let result = store.login(&oauth(), &harness.collaborators).await;

    // Then: Auth error and logged out everywhere
    assert!(matches!(result, Err(CoreError::Auth { .. })));
    assert_eq!(store.status(), (false, None));
    assert!(store.identity().is_none());
    assert!(!harness.storage.state().is_logged_in);
    assert!(harness.storage.state().user.is_none());
}

/// WHAT: Missing client id fails before any window opens
/// WHY: An unconfigured install must not launch a broken consent screen
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_client_id_when_logging_in_then_auth_error_without_flow() {
    // Given: OAuth settings with an empty client id
    let harness = Harness::new();
    let mut store = SessionStore::default();

    // When: Logging in
    let result = store
        .login(&OAuthSettings::default(), &harness.collaborators)
        .await;

    // Then: Auth error and no flow launched
    assert!(matches!(result, Err(CoreError::Auth { .. })));
    assert!(harness.browser.auth_urls.lock().unwrap().is_empty());
}

/// WHAT: Clearing the session persists the logged-out state
/// WHY: Logout must survive a restart
#[tokio::test]
async fn given_logged_in_store_when_clearing_then_logged_out_persisted() {
    // Given: Logged-in store
    let harness = Harness::new();
    harness.seed_logged_in();
    let mut store = SessionStore::default();
    store.load(&harness.storage.state());

    // When: Clearing
    store.clear(&harness.collaborators).await;

    // Then: Logged out in memory and storage
    assert_eq!(store.status(), (false, None));
    let persisted = harness.storage.state();
    assert!(!persisted.is_logged_in);
    assert!(persisted.user.is_none());
    assert!(persisted.auth_token.is_none());
}

/// WHAT: Login flag without a user loads as logged out
/// WHY: Half-written storage must never yield an identity
#[test]
fn given_logged_in_flag_without_user_when_loading_then_logged_out() {
    // Given: Inconsistent persisted state
    let state = PersistedState {
        is_logged_in: true,
        ..PersistedState::default()
    };
    let mut store = SessionStore::default();

    // When: Loading
    store.load(&state);

    // Then: Logged out
    assert_eq!(store.status(), (false, None));
    assert!(store.identity().is_none());
}

/// WHAT: Identity carries the email as user id and the bearer token
/// WHY: Every backend call is keyed by the account email
#[test]
fn given_persisted_session_when_loading_then_identity_uses_email() {
    // Given: Persisted logged-in state
    let state = PersistedState {
        user: Some(User::with_email("grace@example.com")),
        is_logged_in: true,
        auth_token: Some("bearer".to_string()),
        ..PersistedState::default()
    };
    let mut store = SessionStore::default();

    // When: Loading
    store.load(&state);

    // Then: Identity reflects the persisted user
    let identity = store.identity();
    assert_eq!(
        identity.as_ref().map(|i| i.user_id.as_str()),
        Some("grace@example.com")
    );
    assert_eq!(
        identity.and_then(|i| i.token).as_deref(),
        Some("bearer")
    );
}

/// WHAT: Code extraction prefers the code over unrelated parameters
/// WHY: Providers append state and scope parameters to the redirect
#[test]
#[allow(clippy::unwrap_used)]
fn given_redirect_with_extra_params_when_extracting_code_then_code_returned() {
    // Given: Redirect with several parameters
    let redirect = "https://id.chromiumapp.org/?state=xyz&code=4%2F0Abc&scope=openid";

    // When: Extracting the code
    let code = extract_authorization_code(redirect).unwrap();

    // Then: Decoded code is returned
    assert_eq!(code, "4/0Abc");
}

/// WHAT: A redirect without a code is an auth failure
/// WHY: Nothing can be exchanged without a code
#[test]
fn given_redirect_without_code_when_extracting_then_auth_error() {
    // Given: Redirect with no code
    let redirect = "https://id.chromiumapp.org/?state=xyz";

    // When: Extracting the code
    let result = extract_authorization_code(redirect);

    // Then: Auth error
    assert!(matches!(result, Err(CoreError::Auth { .. })));
}
