//! Per-domain foreground dwell time.
//!
//! Time is accrued lazily: every transition (tab switch, navigation, focus
//! change, alarm) first charges the elapsed interval to the tab that was in
//! the foreground, then moves the start reference to "now".

use crate::{
    ActiveTabInfo, Collaborators, DailyActivityLog, Identity, TabId, WorkingHours,
    activity::domain_of,
};

use chrono::{DateTime, Days, Local, NaiveDate, Timelike};
use tracing::{debug, info, instrument, warn};

/// Intervals this short (in seconds) are noise and never accrued.
pub(crate) const MIN_ACCRUAL_SECONDS: i64 = 1;

/// Maintains [`ActiveTabInfo`] and accrues into the [`DailyActivityLog`].
#[derive(Debug, Default)]
pub struct ActivityTracker {
    active: ActiveTabInfo,
    log: DailyActivityLog,
    hours: WorkingHours,
    last_accrual_date: Option<NaiveDate>,
}

impl ActivityTracker {
    /// Tracker counting time inside `hours`.
    pub fn new(hours: WorkingHours) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    /// Adopt the log persisted before a restart.
    pub fn load(&mut self, log: DailyActivityLog) {
        debug!(domains = log.len(), "Activity log loaded");
        self.log = log;
    }

    /// Tab currently measured.
    pub fn active(&self) -> &ActiveTabInfo {
        &self.active
    }

    /// Accumulated log.
    pub fn log(&self) -> &DailyActivityLog {
        &self.log
    }

    /// Charge the working-hours part of the pending interval to the
    /// foreground domain and restart the interval at `now`. Returns the
    /// seconds added.
    pub fn accrue(&mut self, now: DateTime<Local>) -> u64 {
        let mut added = 0;

        if let (Some(domain), Some(start)) = (&self.active.domain, self.active.start_time) {
            let counted = self.hours.overlap_seconds(start, now);
            if counted > MIN_ACCRUAL_SECONDS {
                added = counted.unsigned_abs();
                self.log.add(domain, added);
                self.last_accrual_date = Some(now.date_naive());
                debug!(domain = %domain, seconds = added, "Accrued dwell time");
            }
        }

        if !self.active.is_empty() {
            self.active.start_time = Some(now);
        }

        added
    }

    /// A tab became active.
    #[instrument(skip(self, collaborators))]
    pub async fn on_tab_activated(&mut self, tab_id: TabId, collaborators: &Collaborators) {
        let now = collaborators.clock.now();
        self.accrue(now);

        self.active = match collaborators.browser.get_tab(tab_id).await {
            Ok(tab) => ActiveTabInfo::from_tab(&tab, now),
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "Tab lookup failed, clearing active tab");
                ActiveTabInfo::empty()
            }
        };
    }

    /// The URL of `tab_id` changed in place.
    pub fn on_tab_url_changed(&mut self, tab_id: TabId, url: &str, now: DateTime<Local>) {
        if self.active.tab_id != Some(tab_id) || self.active.url.as_deref() == Some(url) {
            return;
        }

        self.accrue(now);
        self.active.url = Some(url.to_string());
        self.active.domain = domain_of(url);
        self.active.start_time = Some(now);
    }

    /// `tab_id` was closed.
    pub fn on_tab_removed(&mut self, tab_id: TabId, now: DateTime<Local>) {
        if self.active.tab_id == Some(tab_id) {
            self.accrue(now);
            self.active = ActiveTabInfo::empty();
        }
    }

    /// Browser window focus changed. Losing focus entirely clears the tab.
    #[instrument(skip(self, collaborators))]
    pub async fn on_focus_changed(&mut self, focused: bool, collaborators: &Collaborators) {
        self.accrue(collaborators.clock.now());

        if focused {
            self.refresh_from_active_tab(collaborators).await;
        } else {
            self.active = ActiveTabInfo::empty();
        }
    }

    /// Rebuild [`ActiveTabInfo`] from the browser's active-tab query.
    pub async fn refresh_from_active_tab(&mut self, collaborators: &Collaborators) {
        let now = collaborators.clock.now();
        self.active = match collaborators.browser.active_tab().await {
            Ok(Some(tab)) => ActiveTabInfo::from_tab(&tab, now),
            Ok(None) => ActiveTabInfo::empty(),
            Err(e) => {
                warn!(error = %e, "Active tab query failed");
                ActiveTabInfo::empty()
            }
        };
    }

    /// Periodic alarm: accrue and persist the log without resetting it.
    #[instrument(skip(self, collaborators))]
    pub async fn persist_snapshot(&mut self, collaborators: &Collaborators) {
        self.accrue(collaborators.clock.now());

        if let Err(e) = collaborators.storage.save_activity_log(&self.log).await {
            warn!(error = %e, "Failed to persist activity snapshot");
        }
    }

    /// Daily alarm: accrue, send the whole log once, then reset it.
    ///
    /// The reset and its persistence happen whether or not the send worked;
    /// a lost send loses that day's data instead of risking duplicates.
    #[instrument(skip(self, identity, collaborators))]
    pub async fn flush_daily(&mut self, identity: Option<&Identity>, collaborators: &Collaborators) {
        let now = collaborators.clock.now();
        self.accrue(now);

        let date = self.log_date(now);
        match identity {
            Some(identity) if !self.log.is_empty() => {
                let activity = self.log.entries();
                match collaborators
                    .backend
                    .post_activity_log(identity, date, &activity)
                    .await
                {
                    Ok(()) => info!(
                        date = %date,
                        domains = activity.len(),
                        total_seconds = self.log.total_seconds(),
                        "Activity log flushed"
                    ),
                    Err(e) => warn!(date = %date, error = %e, "Activity log flush failed, dropping day"),
                }
            }
            Some(_) => debug!(date = %date, "Activity log empty, nothing to send"),
            None => debug!(date = %date, "Logged out, discarding activity log"),
        }

        self.log.clear();
        self.last_accrual_date = None;

        if let Err(e) = collaborators.storage.save_activity_log(&self.log).await {
            warn!(error = %e, "Failed to persist cleared activity log");
        }
    }

    /// Calendar day the log belongs to. The midnight alarm fires after the
    /// day rolled over, so a log with no known accrual date that is flushed
    /// before working hours belongs to the previous day.
    fn log_date(&self, now: DateTime<Local>) -> NaiveDate {
        let today = now.date_naive();
        self.last_accrual_date.unwrap_or_else(|| {
            if now.hour() < self.hours.start_hour {
                today.checked_sub_days(Days::new(1)).unwrap_or(today)
            } else {
                today
            }
        })
    }
}
