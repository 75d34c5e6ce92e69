mod oauth;
#[allow(clippy::module_inception)]
mod session;
mod store;
mod user;

pub use {oauth::OAuthSettings, session::Session, store::SessionStore, user::User};

pub(crate) use oauth::extract_authorization_code;
