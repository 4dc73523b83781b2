// bases/embed_shim/src/lib.rs
//! Embedding surface for the download engine.
//!
//! A host calls [`run`] with a flat token list and a working directory on a
//! worker thread, and polls [`drain_logs`] from another thread to show
//! progress. Output produced during the call, both our own diagnostics and
//! the engine's child-process output, lands in one process-wide queue.

mod args;
mod orchestrate;

pub use args::{ArgError, ArgValue, ParsedArgs};
pub use log_relay::{LogSink, StreamKind};
pub use orchestrate::Outcome;

use download_engine::{CatalogClient, Downloader, YtDlpEngine};
use log_relay::SinkWriter;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{error, Level};

static LOG_SINK: OnceLock<LogSink> = OnceLock::new();

fn log_sink() -> &'static LogSink {
    LOG_SINK.get_or_init(LogSink::new)
}

/// Drain every captured log line, oldest first, leaving the queue empty.
/// Never blocks; returns an empty list when nothing is buffered.
pub fn drain_logs() -> Vec<(StreamKind, String)> {
    log_sink().drain()
}

/// Run the tool with a flat token list, resolving relative output paths
/// against `work_dir`. Returns 0 on success and 1 on any failure.
///
/// The design assumes at most one call in flight at a time: concurrent
/// calls would interleave their output in the shared queue.
pub fn run(args: &[String], work_dir: &Path) -> i32 {
    with_captured_output(|sink| {
        if let Some(outcome) = prepare_work_dir(work_dir) {
            return outcome;
        }
        let parsed = ParsedArgs::parse(args);
        let (client_options, downloader_options) =
            match orchestrate::build_options(&parsed, work_dir) {
                Ok(options) => options,
                Err(e) => {
                    error!("Error: {}", e);
                    return Outcome::BadArguments;
                }
            };
        let engine = YtDlpEngine::new(client_options, downloader_options, sink.clone());
        block_on_orchestrate(args, &parsed, &engine, &engine)
    })
    .exit_code()
}

/// Same flow as [`run`] with caller-provided engine halves. Lets tests and
/// alternative hosts substitute the search and download seams.
pub fn run_with_engine(
    args: &[String],
    work_dir: &Path,
    client: &dyn CatalogClient,
    downloader: &dyn Downloader,
) -> i32 {
    with_captured_output(|_sink| {
        if let Some(outcome) = prepare_work_dir(work_dir) {
            return outcome;
        }
        let parsed = ParsedArgs::parse(args);
        if let Err(e) = orchestrate::build_options(&parsed, work_dir) {
            error!("Error: {}", e);
            return Outcome::BadArguments;
        }
        block_on_orchestrate(args, &parsed, client, downloader)
    })
    .exit_code()
}

fn prepare_work_dir(work_dir: &Path) -> Option<Outcome> {
    match std::fs::create_dir_all(work_dir) {
        Ok(()) => None,
        Err(e) => {
            error!(
                "Error: cannot prepare working directory {}: {}",
                work_dir.display(),
                e
            );
            Some(Outcome::EngineFailure)
        }
    }
}

/// Route `tracing` output into the shared queue for the duration of one
/// call. Scoped with `with_default` so repeated calls do not fight over a
/// global subscriber.
fn with_captured_output(f: impl FnOnce(&LogSink) -> Outcome) -> Outcome {
    let sink = log_sink();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SinkWriter::new(sink.clone(), StreamKind::Stdout))
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, || f(sink))
}

fn block_on_orchestrate(
    args: &[String],
    parsed: &ParsedArgs,
    client: &dyn CatalogClient,
    downloader: &dyn Downloader,
) -> Outcome {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Error: failed to start runtime: {}", e);
            return Outcome::EngineFailure;
        }
    };
    runtime.block_on(orchestrate::orchestrate(args, parsed, client, downloader))
}
