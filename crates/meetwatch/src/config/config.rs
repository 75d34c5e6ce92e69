//! Configuration management for meetwatch.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{BackendConfig, CaptureConfig, OAuthConfig, TrackingConfig},
};

use meetwatch_core::{CoordinatorSettings, MeetingPatterns, OAuthSettings, WorkingHours};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

const CONFIG_FILE: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend service configuration.
    #[serde(default)]
    pub backend: BackendConfig,
    /// OAuth client configuration.
    #[serde(default)]
    pub oauth: OAuthConfig,
    /// Dwell-time tracking configuration.
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Meeting capture configuration.
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating the
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there when absent.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::Config {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::Config {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: String| AppError::Config {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let base_url = Url::parse(&self.backend.base_url)
            .map_err(|e| invalid(format!("Invalid backend.base_url: {}", e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "backend.base_url must be http or https, got {}",
                base_url.scheme()
            )));
        }

        if self.backend.request_timeout_secs == 0 || self.backend.host_call_timeout_secs == 0 {
            return Err(invalid("Timeouts must be at least one second".to_string()));
        }

        let TrackingConfig {
            working_hours_start,
            working_hours_end,
            snapshot_interval_minutes,
        } = self.tracking;
        if working_hours_start > 23 || working_hours_end > 24 {
            return Err(invalid(format!(
                "Working hours out of range: {}-{}",
                working_hours_start, working_hours_end
            )));
        }
        if working_hours_start == working_hours_end {
            return Err(invalid(
                "Working hours start and end must differ".to_string(),
            ));
        }
        if snapshot_interval_minutes == 0 {
            return Err(invalid(
                "tracking.snapshot_interval_minutes must be at least 1".to_string(),
            ));
        }

        if MeetingPatterns::new(self.capture.meeting_patterns.iter().cloned())
            .patterns()
            .is_empty()
        {
            return Err(invalid(
                "capture.meeting_patterns must list at least one pattern".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to `path` using the atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::Config {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        write_atomic(path, contents.as_bytes()).map_err(|e| AppError::Config {
            reason: format!("Failed to write config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Settings the coordinator is built with.
    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            oauth: OAuthSettings::from(&self.oauth),
            working_hours: WorkingHours::new(
                self.tracking.working_hours_start,
                self.tracking.working_hours_end,
            ),
            meeting_patterns: MeetingPatterns::new(self.capture.meeting_patterns.iter().cloned()),
        }
    }

    /// Interval between activity log snapshots.
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.tracking.snapshot_interval_minutes.saturating_mul(60))
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    /// Host call timeout.
    pub fn host_call_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.host_call_timeout_secs)
    }

    /// Platform data directory for logs and durable state, created on demand.
    #[track_caller]
    pub fn data_dir() -> AppResult<PathBuf> {
        let data_dir = project_dirs()?.data_dir().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
            debug!(data_dir = ?data_dir, "Created data directory");
        }

        Ok(data_dir)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join(CONFIG_FILE))
    }
}

#[track_caller]
fn project_dirs() -> AppResult<ProjectDirs> {
    ProjectDirs::from("com", "meetwatch", "Meetwatch").ok_or_else(|| AppError::Config {
        reason: "Failed to get project directories".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Write `contents` to a sibling temp file, sync it, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(contents)?;
    temp_file.sync_all()?;

    fs::rename(&temp_path, path)
}
