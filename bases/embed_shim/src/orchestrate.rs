// bases/embed_shim/src/orchestrate.rs
use crate::args::{ArgError, ParsedArgs};
use download_engine::{CatalogClient, ClientOptions, Downloader, DownloaderOptions};
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// How one invocation ended.
///
/// The embedding boundary collapses everything but `Success` to exit code 1;
/// the distinction still reaches the host through the captured log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    BadArguments,
    UnrecognizedCommand,
    NoResults,
    EngineFailure,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            _ => 1,
        }
    }
}

/// Build the engine configuration from parsed flags, one field per
/// recognized key, defaults as documented on the option structs. A relative
/// output template is resolved against the working directory instead of
/// changing the process-wide directory.
pub(crate) fn build_options(
    parsed: &ParsedArgs,
    work_dir: &Path,
) -> Result<(ClientOptions, DownloaderOptions), ArgError> {
    let defaults = DownloaderOptions::default();

    let output = parsed.text_or("output", &defaults.output);
    let output = if Path::new(&output).is_absolute() {
        output
    } else {
        work_dir.join(&output).to_string_lossy().into_owned()
    };

    let options = DownloaderOptions {
        output,
        format: parsed.text_or("format", &defaults.format),
        bitrate: parsed.text("bitrate").map(str::to_string),
        ffmpeg: parsed.text_or("ffmpeg", &defaults.ffmpeg),
        threads: parsed.number("threads", defaults.threads)?,
        variable_bitrate: parsed.text("variable_bitrate").map(str::to_string),
        constant_bitrate: parsed.text("constant_bitrate").map(str::to_string),
        log_level: parsed.text_or("log_level", &defaults.log_level),
        simple_tui: parsed.switch("simple_tui"),
        print_errors: parsed.switch("print_errors"),
        sponsor_block: parsed.switch("sponsor_block"),
        preload: parsed.switch("preload"),
        generate_lrc: parsed.switch("generate_lrc"),
        force_update_metadata: parsed.switch("force_update_metadata"),
        restrict: parsed.switch("restrict"),
        detect_formats: parsed.switch("detect_formats"),
        id3_separator: parsed.text_or("id3_separator", &defaults.id3_separator),
        ytm_data: parsed.switch("ytm_data"),
        add_unavailable: parsed.switch("add_unavailable"),
        set_cookie: parsed.text("set_cookie").map(str::to_string),
        user_auth: parsed.switch("user_auth"),
        headers: parsed.switch("headers"),
        overwrite: parsed.text_or("overwrite", &defaults.overwrite),
        port: parsed.number("port", defaults.port)?,
        host: parsed.text_or("host", &defaults.host),
        keep_temp: parsed.switch("keep_temp"),
        no_config: parsed.switch("no_config"),
        only_verified_results: parsed.switch("only_verified_results"),
        search_query: parsed.text("search_query").map(str::to_string),
        filter_results: parsed.text("filter_results").map(str::to_string),
        yt_dlp_args: parsed.text("yt_dlp_args").map(str::to_string),
    };

    let client = ClientOptions {
        client_id: parsed.text("client_id").map(str::to_string),
        client_secret: parsed.text("client_secret").map(str::to_string),
        user_auth: parsed.switch("user_auth"),
        cache_path: parsed.text("cache_path").map(PathBuf::from),
        no_config: parsed.switch("no_config"),
    };

    Ok((client, options))
}

/// The single linear flow: one branch on the command token, one on search
/// emptiness, everything else reported as an engine failure.
pub(crate) async fn orchestrate(
    raw_args: &[String],
    parsed: &ParsedArgs,
    client: &dyn CatalogClient,
    downloader: &dyn Downloader,
) -> Outcome {
    // The control token is checked against the raw list, not the parsed map.
    if !raw_args.iter().any(|token| token == "download") {
        error!("Command not recognized");
        return Outcome::UnrecognizedCommand;
    }

    let query = parsed.query();
    if query.is_empty() {
        error!("No query given; nothing to download");
        return Outcome::BadArguments;
    }

    if let Err(e) = downloader.check_available().await {
        report("engine unavailable", &e);
        return Outcome::EngineFailure;
    }

    info!("Searching for {} query term(s)", query.len());
    let tracks = match client.search(query).await {
        Ok(tracks) => tracks,
        Err(e) => {
            report("search failed", &e);
            return Outcome::EngineFailure;
        }
    };

    if tracks.is_empty() {
        info!("No songs found for the query");
        return Outcome::NoResults;
    }

    match downloader.download(&tracks).await {
        Ok(()) => {
            info!("Downloaded {} track(s)", tracks.len());
            Outcome::Success
        }
        Err(e) => {
            report("download failed", &e);
            Outcome::EngineFailure
        }
    }
}

fn report(context: &str, error: &dyn StdError) {
    error!("Error: {}: {}", context, error);
    let mut source = error.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
}
