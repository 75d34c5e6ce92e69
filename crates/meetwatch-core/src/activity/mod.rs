mod active_tab;
mod daily_log;
mod tracker;
mod working_hours;

pub use {
    active_tab::ActiveTabInfo,
    daily_log::{ActivityEntry, DailyActivityLog},
    tracker::ActivityTracker,
    working_hours::WorkingHours,
};

pub(crate) use daily_log::domain_of;
