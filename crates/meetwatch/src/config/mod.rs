mod backend_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod oauth_config;
mod tracking_config;

pub(crate) use {
    backend_config::BackendConfig, capture_config::CaptureConfig, config::Config,
    oauth_config::OAuthConfig, tracking_config::TrackingConfig,
};

use meetwatch_core::WorkingHours;

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_HOST_CALL_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_SNAPSHOT_INTERVAL_MINUTES: u64 = 15;

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

pub(crate) fn default_host_call_timeout_secs() -> u64 {
    DEFAULT_HOST_CALL_TIMEOUT_SECS
}

pub(crate) fn default_working_hours_start() -> u32 {
    WorkingHours::default().start_hour
}

pub(crate) fn default_working_hours_end() -> u32 {
    WorkingHours::default().end_hour
}

pub(crate) fn default_snapshot_interval_minutes() -> u64 {
    DEFAULT_SNAPSHOT_INTERVAL_MINUTES
}
