mod framing;
mod host_bridge;
mod transport;
mod wire;

pub(crate) use {
    framing::{read_frame, write_frame},
    host_bridge::NativeHost,
    transport::{run_reader, run_writer},
    wire::{CallResponse, HostCall, Inbound, Outbound, RelayTarget},
};

#[cfg(test)]
pub(crate) use {framing::MAX_FRAME_BYTES, host_bridge::NO_RECEIVER_ERROR, wire::EventFrame};
