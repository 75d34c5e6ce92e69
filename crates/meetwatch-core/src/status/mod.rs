mod broadcaster;
mod snapshot;

pub use {broadcaster::StatusBroadcaster, snapshot::StatusSnapshot};
