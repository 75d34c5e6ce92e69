use crate::{Tab, TabId, activity::domain_of};

use chrono::{DateTime, Local};

/// The foreground tab dwell time is currently being measured against.
///
/// Every field is optional: an empty value means no browser window has focus
/// or the active tab could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveTabInfo {
    /// Foreground tab.
    pub tab_id: Option<TabId>,
    /// Its URL.
    pub url: Option<String>,
    /// Bare hostname of `url`, when it has one.
    pub domain: Option<String>,
    /// When measurement against this tab (re)started.
    pub start_time: Option<DateTime<Local>>,
}

impl ActiveTabInfo {
    /// Nothing in the foreground.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start measuring `tab` from `now`.
    pub fn from_tab(tab: &Tab, now: DateTime<Local>) -> Self {
        Self {
            tab_id: Some(tab.id),
            url: tab.url.clone(),
            domain: tab.url.as_deref().and_then(domain_of),
            start_time: Some(now),
        }
    }

    /// Whether any tab is being measured.
    pub fn is_empty(&self) -> bool {
        self.tab_id.is_none()
    }
}
