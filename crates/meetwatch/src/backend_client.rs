//! HTTP client for the meeting assistant backend.

use crate::{AppError, AppResult};

use meetwatch_core::{
    ActivityEntry, AuthExchange, Backend, CoreError, CoreResult, Identity, User,
};

use std::{panic::Location, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use error_location::ErrorLocation;
use reqwest::{Client, RequestBuilder, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

pub(crate) const AUTH_CALLBACK_PATH: &str = "auth/google/callback";
pub(crate) const AUDIO_STREAM_PATH: &str = "audio/stream";
pub(crate) const AUDIO_STREAM_END_PATH: &str = "audio/stream/end";
pub(crate) const ACTIVITY_LOG_PATH: &str = "activity/log";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthCallbackRequest<'a> {
    pub(crate) code: &'a str,
    pub(crate) redirect_uri: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthCallbackResponse {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) user: Option<User>,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StreamChunkRequest<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) recording_id: &'a str,
    pub(crate) chunk: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EndStreamRequest<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) recording_id: &'a str,
    pub(crate) reason: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityLogRequest<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) date: NaiveDate,
    pub(crate) activity: &'a [ActivityEntry],
}

/// Backend reached over HTTP with JSON bodies.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Client for `base_url` with a per-request timeout.
    #[track_caller]
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| AppError::Config {
            reason: format!("Invalid backend URL: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { client, base_url })
    }

    /// Absolute URL for an endpoint path.
    #[track_caller]
    pub(crate) fn endpoint(&self, path: &str) -> CoreResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CoreError::NetworkDelivery {
                reason: format!("Invalid endpoint {}: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        identity: &Identity,
        body: &B,
    ) -> CoreResult<()> {
        let url = self.endpoint(path)?;
        let request = with_bearer(self.client.post(url).json(body), identity.token.as_deref());

        let response = request.send().await.map_err(|e| CoreError::NetworkDelivery {
            reason: format!("POST {} failed: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::NetworkDelivery {
                reason: format!("POST {} returned {}: {}", path, status, body.trim()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(path, status = status.as_u16(), "Backend accepted request");
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self, code))]
    async fn exchange_auth_code(&self, code: &str, redirect_uri: &str) -> CoreResult<AuthExchange> {
        let url = self.endpoint(AUTH_CALLBACK_PATH)?;
        let body = AuthCallbackRequest { code, redirect_uri };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Auth {
                reason: format!("Token exchange request failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let status = response.status();
        // The backend answers failures with a JSON body too, so decode first.
        let parsed: AuthCallbackResponse = response.json().await.map_err(|e| CoreError::Auth {
            reason: format!("Unreadable token exchange response ({}): {}", status, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        match parsed {
            AuthCallbackResponse {
                success: true,
                user: Some(user),
                token,
                ..
            } if status.is_success() => Ok(AuthExchange { user, token }),
            AuthCallbackResponse { error, .. } => Err(CoreError::Auth {
                reason: error.unwrap_or_else(|| format!("Backend returned {}", status)),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[instrument(skip(self, identity, chunk), fields(user_id = %identity.user_id, chunk_len = chunk.len()))]
    async fn stream_chunk(
        &self,
        identity: &Identity,
        recording_id: &str,
        chunk: &str,
    ) -> CoreResult<()> {
        let body = StreamChunkRequest {
            user_id: &identity.user_id,
            recording_id,
            chunk,
        };
        self.post_json(AUDIO_STREAM_PATH, identity, &body).await
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    async fn end_stream(
        &self,
        identity: &Identity,
        recording_id: &str,
        reason: &str,
    ) -> CoreResult<()> {
        let body = EndStreamRequest {
            user_id: &identity.user_id,
            recording_id,
            reason,
        };
        self.post_json(AUDIO_STREAM_END_PATH, identity, &body).await
    }

    #[instrument(skip(self, identity, activity), fields(user_id = %identity.user_id, domains = activity.len()))]
    async fn post_activity_log(
        &self,
        identity: &Identity,
        date: NaiveDate,
        activity: &[ActivityEntry],
    ) -> CoreResult<()> {
        let body = ActivityLogRequest {
            user_id: &identity.user_id,
            date,
            activity,
        };
        self.post_json(ACTIVITY_LOG_PATH, identity, &body).await
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
        None => request,
    }
}
