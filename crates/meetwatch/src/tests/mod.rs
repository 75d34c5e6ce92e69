mod storage;
mod transport;
mod wire;
