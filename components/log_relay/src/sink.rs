// components/log_relay/src/sink.rs
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Which stream a captured line was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// A thread-safe FIFO of captured output lines.
///
/// Producers push lines as they arrive; a consumer on another thread drains
/// whatever is buffered. The queue is unbounded and the drain never blocks.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    queue: Arc<Mutex<VecDeque<(StreamKind, String)>>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue one entry. Writes consisting only of whitespace are dropped.
    pub fn push(&self, kind: StreamKind, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.queue.lock().push_back((kind, text));
    }

    /// Remove and return every buffered entry, in arrival order.
    pub fn drain(&self) -> Vec<(StreamKind, String)> {
        self.queue.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
