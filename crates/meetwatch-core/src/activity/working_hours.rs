use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_WORKING_HOURS_START: u32 = 9;
pub(crate) const DEFAULT_WORKING_HOURS_END: u32 = 18;

/// Local-time hour range `[start_hour, end_hour)` in which dwell time counts.
///
/// A range whose start is after its end wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// First hour inside the window (0-23).
    pub start_hour: u32,
    /// First hour after the window (0-24).
    pub end_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_WORKING_HOURS_START,
            end_hour: DEFAULT_WORKING_HOURS_END,
        }
    }
}

impl WorkingHours {
    /// Window covering `[start_hour, end_hour)`.
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether `at` falls inside the window.
    pub fn contains(&self, at: &DateTime<Local>) -> bool {
        let hour = at.hour();
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    /// Whole seconds of `[from, to)` that fall inside the window.
    ///
    /// The interval may span several local days; each day's window (or the
    /// wrapped window starting that day) is clipped against it.
    pub fn overlap_seconds(&self, from: DateTime<Local>, to: DateTime<Local>) -> i64 {
        if to <= from {
            return 0;
        }

        let wraps = self.start_hour > self.end_hour;
        let mut total = 0;
        // A wrapped window that started the evening before can still cover `from`.
        let mut day = from
            .date_naive()
            .checked_sub_days(Days::new(1))
            .unwrap_or(from.date_naive());
        let last_day = to.date_naive();

        while day <= last_day {
            let end_day = if wraps {
                day.checked_add_days(Days::new(1)).unwrap_or(day)
            } else {
                day
            };
            if let (Some(window_start), Some(window_end)) =
                (local_hour(day, self.start_hour), local_hour(end_day, self.end_hour))
            {
                let start = window_start.max(from);
                let end = window_end.min(to);
                if end > start {
                    total += (end - start).num_seconds();
                }
            }

            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }

        total
    }
}

/// `hour:00` local time on `day`; hour 24 is the next midnight. Falls forward
/// an hour when the wall time does not exist.
fn local_hour(day: NaiveDate, hour: u32) -> Option<DateTime<Local>> {
    let (day, hour) = if hour >= 24 {
        (day.checked_add_days(Days::new(1))?, 0)
    } else {
        (day, hour)
    };
    let at = day.and_time(NaiveTime::from_hms_opt(hour, 0, 0)?);
    Local
        .from_local_datetime(&at)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(at + chrono::Duration::hours(1)))
                .earliest()
        })
}
