//! Persisted login state and the OAuth login flow.

use crate::{
    Collaborators, CoreError, CoreResult, Identity, OAuthSettings, PersistedState, Session, User,
    session::extract_authorization_code,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};

/// Owns the in-memory [`Session`] and keeps durable storage in step with it.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    /// Adopt the persisted session read at startup.
    pub fn load(&mut self, state: &PersistedState) {
        self.session = state.session();
        info!(logged_in = self.session.is_logged_in(), "Session loaded");
    }

    /// Current `{loggedIn, user}` without any I/O.
    pub fn status(&self) -> (bool, Option<&User>) {
        (self.session.is_logged_in(), self.session.user())
    }

    /// Current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Identity for backend requests, `None` while logged out.
    pub fn identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    /// Run the interactive OAuth flow and exchange the code with the backend.
    ///
    /// Any failure forces the session back to logged out (persisted) before
    /// the error is returned.
    #[instrument(skip(self, settings, collaborators))]
    pub async fn login(
        &mut self,
        settings: &OAuthSettings,
        collaborators: &Collaborators,
    ) -> CoreResult<User> {
        match Self::authorize(settings, collaborators)
            .await
            .map_err(into_auth_error)
        {
            Ok(exchange) => {
                self.session = Session::logged_in(exchange.user.clone(), exchange.token);
                self.persist(collaborators).await;
                info!(user = %exchange.user.email, "Login succeeded");
                Ok(exchange.user)
            }
            Err(e) => {
                warn!(error = %e, "Login failed, resetting session");
                self.session = Session::logged_out();
                self.persist(collaborators).await;
                Err(e)
            }
        }
    }

    /// Clear and persist the logged-out state.
    #[instrument(skip(self, collaborators))]
    pub async fn clear(&mut self, collaborators: &Collaborators) {
        self.session = Session::logged_out();
        self.persist(collaborators).await;
        info!("Logged out");
    }

    async fn authorize(
        settings: &OAuthSettings,
        collaborators: &Collaborators,
    ) -> CoreResult<crate::AuthExchange> {
        let redirect_uri = collaborators.browser.redirect_url().await?;
        let auth_url = settings.authorization_url(&redirect_uri)?;

        let redirect = collaborators
            .browser
            .launch_web_auth_flow(&auth_url)
            .await?
            .ok_or_else(|| CoreError::Auth {
                reason: "Authorization was cancelled".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let code = extract_authorization_code(&redirect)?;

        collaborators
            .backend
            .exchange_auth_code(&code, &redirect_uri)
            .await
    }

    async fn persist(&self, collaborators: &Collaborators) {
        if let Err(e) = collaborators.storage.save_session(&self.session).await {
            warn!(error = %e, "Failed to persist session");
        }
    }
}

/// Every login failure surfaces as [`CoreError::Auth`].
#[track_caller]
fn into_auth_error(error: CoreError) -> CoreError {
    match error {
        CoreError::Auth { .. } => error,
        other => CoreError::Auth {
            reason: other.user_message(),
            location: ErrorLocation::from(Location::caller()),
        },
    }
}
