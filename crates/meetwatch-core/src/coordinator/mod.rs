mod collaborators;
#[allow(clippy::module_inception)]
mod coordinator;
mod host_event;
mod settings;

pub use {
    collaborators::Collaborators,
    coordinator::Coordinator,
    host_event::{AlarmKind, HostEvent},
    settings::CoordinatorSettings,
};
