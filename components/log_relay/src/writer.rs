// components/log_relay/src/writer.rs
use crate::{LogSink, StreamKind};
use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::writer::MakeWriter;

/// Bridges `io::Write` output into a [`LogSink`].
///
/// Each write is split into lines and every non-blank line is enqueued with
/// this writer's stream kind. `flush` is a no-op; there is nothing buffered
/// beyond the queue itself.
#[derive(Debug, Clone)]
pub struct SinkWriter {
    sink: LogSink,
    kind: StreamKind,
}

impl SinkWriter {
    pub fn new(sink: LogSink, kind: StreamKind) -> Self {
        Self { sink, kind }
    }
}

impl io::Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines() {
            self.sink.push(self.kind, line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }

    // Warnings and errors land on the stderr side of the queue, everything
    // else keeps the writer's default kind.
    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        let kind = if *meta.level() <= Level::WARN {
            StreamKind::Stderr
        } else {
            self.kind
        };
        SinkWriter::new(self.sink.clone(), kind)
    }
}
