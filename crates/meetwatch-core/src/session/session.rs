use crate::{Identity, User};

/// Process-wide login state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    logged_in: bool,
    auth_token: Option<String>,
}

impl Session {
    /// The logged-out session.
    pub fn logged_out() -> Self {
        Self::default()
    }

    /// A logged-in session for `user`.
    pub fn logged_in(user: User, auth_token: Option<String>) -> Self {
        Self {
            user: Some(user),
            logged_in: true,
            auth_token,
        }
    }

    /// Whether a user is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.logged_in && self.user.is_some()
    }

    /// Logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref().filter(|_| self.logged_in)
    }

    /// Bearer token from the token exchange, if any.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Identity for backend requests. `None` while logged out.
    pub fn identity(&self) -> Option<Identity> {
        self.user().map(|user| Identity {
            user_id: user.email.clone(),
            token: self.auth_token.clone(),
        })
    }
}
