//! Periodic snapshot and daily midnight alarms.

use crate::{AppCommand, AppError, AppResult};

use meetwatch_core::{AlarmKind, HostEvent};

use std::{panic::Location, time::Duration};

use chrono::{DateTime, Days, Local, LocalResult, NaiveTime, TimeZone};
use error_location::ErrorLocation;
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, instrument};

/// Shortest time between two daily flushes.
pub(crate) const MIN_FLUSH_GAP: Duration = Duration::from_secs(1);

/// Fires [`HostEvent::Alarm`] into the coordinator.
pub struct AlarmScheduler {
    command_tx: mpsc::UnboundedSender<AppCommand>,
    snapshot_interval: Duration,
}

impl AlarmScheduler {
    /// Scheduler with a snapshot every `snapshot_interval`.
    pub fn new(command_tx: mpsc::UnboundedSender<AppCommand>, snapshot_interval: Duration) -> Self {
        Self {
            command_tx,
            snapshot_interval,
        }
    }

    /// Run until shutdown is signalled.
    ///
    /// The midnight deadline is recomputed every iteration so clock changes
    /// and DST shifts are picked up.
    #[instrument(skip_all, fields(snapshot_secs = self.snapshot_interval.as_secs()))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let mut snapshot = time::interval_at(
            Instant::now() + self.snapshot_interval,
            self.snapshot_interval,
        );
        snapshot.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_flush = None;

        loop {
            let until_midnight = next_flush_delay(Local::now(), last_flush);
            debug!(secs = until_midnight.as_secs(), "Next daily flush scheduled");

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Alarm scheduler shutting down");
                    break;
                }
                _ = snapshot.tick() => {
                    self.fire(AlarmKind::PersistSnapshot)?;
                }
                _ = time::sleep(until_midnight) => {
                    last_flush = Some(Local::now());
                    self.fire(AlarmKind::DailyFlush)?;
                }
            }
        }

        Ok(())
    }

    #[track_caller]
    fn fire(&self, alarm: AlarmKind) -> AppResult<()> {
        debug!(?alarm, "Alarm fired");
        self.command_tx
            .send(AppCommand::Dispatch {
                event: HostEvent::Alarm { alarm },
                reply_to: None,
            })
            .map_err(|e| AppError::ChannelSendFailed {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Delay until the next daily flush.
///
/// A wake-up that lands just before midnight would otherwise schedule that
/// same midnight again, so nothing is scheduled within [`MIN_FLUSH_GAP`] of
/// `last_flush`.
pub(crate) fn next_flush_delay(
    now: DateTime<Local>,
    last_flush: Option<DateTime<Local>>,
) -> Duration {
    let earliest = last_flush
        .and_then(|at| chrono::Duration::from_std(MIN_FLUSH_GAP).ok().map(|gap| at + gap))
        .filter(|earliest| *earliest > now);

    match earliest {
        Some(earliest) => {
            let wait = (earliest - now).to_std().unwrap_or_default();
            wait + duration_until_next_midnight(earliest)
        }
        None => duration_until_next_midnight(now),
    }
}

/// Time from `now` to the start of the next local day.
///
/// When midnight does not exist (a DST gap at 00:00) the first valid instant
/// after it is used.
pub(crate) fn duration_until_next_midnight(now: DateTime<Local>) -> Duration {
    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return Duration::from_secs(24 * 60 * 60);
    };

    let midnight = tomorrow.and_time(NaiveTime::MIN);
    let next = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(at) => Some(at),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => Local
            .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
            .earliest(),
    };

    next.and_then(|next| (next - now).to_std().ok())
        .filter(|d| !d.is_zero())
        .unwrap_or(Duration::from_secs(1))
}
