use meetwatch_core::HostEvent;

/// Commands delivered to the coordinator task.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Hand one host event to the coordinator.
    Dispatch {
        /// The event.
        event: HostEvent,
        /// Request id to answer when the event came from the popup.
        reply_to: Option<u64>,
    },
    /// Request application shutdown.
    Shutdown,
}
