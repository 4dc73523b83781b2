// components/log_relay/src/lib.rs
mod sink;
mod writer;

pub use sink::{LogSink, StreamKind};
pub use writer::SinkWriter;
