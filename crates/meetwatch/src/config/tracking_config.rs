use crate::config::{
    default_snapshot_interval_minutes, default_working_hours_end, default_working_hours_start,
};

use serde::{Deserialize, Serialize};

/// Dwell-time tracking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// First local hour counted (0-23).
    #[serde(default = "default_working_hours_start")]
    pub working_hours_start: u32,
    /// First local hour no longer counted (0-24).
    #[serde(default = "default_working_hours_end")]
    pub working_hours_end: u32,
    /// Minutes between activity log snapshots.
    #[serde(default = "default_snapshot_interval_minutes")]
    pub snapshot_interval_minutes: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            snapshot_interval_minutes: default_snapshot_interval_minutes(),
        }
    }
}
