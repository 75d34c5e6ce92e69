mod message;
mod response;

pub use {message::RelayMessage, response::RelayResponse};
