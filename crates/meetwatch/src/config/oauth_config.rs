use meetwatch_core::OAuthSettings;

use serde::{Deserialize, Serialize};

/// OAuth client registration used by the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Client id issued by the provider. Login fails until this is set.
    #[serde(default)]
    pub client_id: String,
    /// Authorization endpoint.
    #[serde(default = "default_auth_endpoint")]
    pub auth_endpoint: String,
    /// Requested scopes.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        let settings = OAuthSettings::default();
        Self {
            client_id: settings.client_id,
            auth_endpoint: settings.auth_endpoint,
            scopes: settings.scopes,
        }
    }
}

impl From<&OAuthConfig> for OAuthSettings {
    fn from(config: &OAuthConfig) -> Self {
        OAuthSettings {
            client_id: config.client_id.clone(),
            auth_endpoint: config.auth_endpoint.clone(),
            scopes: config.scopes.clone(),
        }
    }
}

fn default_auth_endpoint() -> String {
    OAuthSettings::default().auth_endpoint
}

fn default_scopes() -> Vec<String> {
    OAuthSettings::default().scopes
}
