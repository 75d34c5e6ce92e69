use crate::{RelayMessage, TabId};

use serde::{Deserialize, Serialize};

/// Timers the host fires into the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlarmKind {
    /// Once a day at local midnight: send and reset the activity log.
    DailyFlush,
    /// Every few minutes: persist the activity log.
    PersistSnapshot,
}

/// Everything the host environment can tell the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    /// The coordinator process (re)started.
    Startup,
    /// A tab became the active tab of its window.
    TabActivated {
        /// Newly active tab.
        tab_id: TabId,
    },
    /// A tab changed in place. `url` is set only when the URL changed.
    TabUpdated {
        /// Updated tab.
        tab_id: TabId,
        /// New URL.
        #[serde(default)]
        url: Option<String>,
    },
    /// A tab was closed.
    TabRemoved {
        /// Closed tab.
        tab_id: TabId,
    },
    /// Browser window focus changed; `false` when no browser window has focus.
    WindowFocusChanged {
        /// Whether any browser window is focused.
        focused: bool,
    },
    /// An alarm fired.
    Alarm {
        /// Which alarm.
        alarm: AlarmKind,
    },
    /// A relay message from the popup or the audio surface.
    Message {
        /// The message.
        message: RelayMessage,
    },
}
