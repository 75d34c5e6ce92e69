use crate::{CoreError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use url::Url;

pub(crate) const DEFAULT_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// OAuth client settings for the interactive authorization-code flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
    /// OAuth client id registered for the extension.
    pub client_id: String,
    /// Provider authorization endpoint.
    pub auth_endpoint: String,
    /// Requested scopes.
    pub scopes: Vec<String>,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
            scopes: [
                "https://www.googleapis.com/auth/calendar",
                "https://www.googleapis.com/auth/userinfo.profile",
                "https://www.googleapis.com/auth/userinfo.email",
                "openid",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl OAuthSettings {
    /// Authorization URL that asks for an offline-capable authorization code.
    #[track_caller]
    pub fn authorization_url(&self, redirect_uri: &str) -> CoreResult<String> {
        if self.client_id.trim().is_empty() {
            return Err(CoreError::Auth {
                reason: "OAuth client id is not configured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut url = Url::parse(&self.auth_endpoint).map_err(|e| CoreError::Auth {
            reason: format!("Invalid authorization endpoint: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");

        Ok(url.into())
    }
}

/// Pull the `code` parameter out of the redirect URL the auth flow ended on.
#[track_caller]
pub(crate) fn extract_authorization_code(redirect: &str) -> CoreResult<String> {
    let url = Url::parse(redirect).map_err(|e| CoreError::Auth {
        reason: format!("Malformed redirect URL: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut code = None;
    let mut provider_error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "error" => provider_error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, provider_error) {
        (Some(code), _) => Ok(code),
        (None, Some(error)) => Err(CoreError::Auth {
            reason: format!("Provider returned error: {}", error),
            location: ErrorLocation::from(Location::caller()),
        }),
        (None, None) => Err(CoreError::Auth {
            reason: "No authorization code returned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
