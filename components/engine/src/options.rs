// components/engine/src/options.rs
use std::path::PathBuf;

/// The full option surface the embedding host may configure.
///
/// Every field carries the default the host relies on when the matching
/// `--key` token is absent. Some keys have no effect on a given backend;
/// they are still carried so the host's key set round-trips unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloaderOptions {
    /// Output path or template, resolved against the working directory
    pub output: String,
    /// Target audio format
    pub format: String,
    pub bitrate: Option<String>,
    /// Name or path of the ffmpeg binary
    pub ffmpeg: String,
    /// Concurrent download limit
    pub threads: usize,
    pub variable_bitrate: Option<String>,
    pub constant_bitrate: Option<String>,
    pub log_level: String,
    pub simple_tui: bool,
    pub print_errors: bool,
    /// Strip sponsored segments from downloaded audio
    pub sponsor_block: bool,
    pub preload: bool,
    /// Write a synced-lyrics sidecar next to each track
    pub generate_lrc: bool,
    pub force_update_metadata: bool,
    /// Restrict filenames to ASCII
    pub restrict: bool,
    pub detect_formats: bool,
    pub id3_separator: String,
    pub ytm_data: bool,
    pub add_unavailable: bool,
    /// Cookie file handed to the backend
    pub set_cookie: Option<String>,
    pub user_auth: bool,
    pub headers: bool,
    /// One of "force", "skip", "metadata"
    pub overwrite: String,
    /// Port for the auth callback server
    pub port: u16,
    /// Host for the auth callback server
    pub host: String,
    pub keep_temp: bool,
    pub no_config: bool,
    pub only_verified_results: bool,
    pub search_query: Option<String>,
    pub filter_results: Option<String>,
    /// Extra arguments passed through to the backend verbatim
    pub yt_dlp_args: Option<String>,
}

impl Default for DownloaderOptions {
    fn default() -> Self {
        Self {
            output: "./".to_string(),
            format: "mp3".to_string(),
            bitrate: None,
            ffmpeg: "ffmpeg".to_string(),
            threads: 1,
            variable_bitrate: None,
            constant_bitrate: None,
            log_level: "INFO".to_string(),
            simple_tui: false,
            print_errors: false,
            sponsor_block: false,
            preload: false,
            generate_lrc: false,
            force_update_metadata: false,
            restrict: false,
            detect_formats: false,
            id3_separator: "/".to_string(),
            ytm_data: false,
            add_unavailable: false,
            set_cookie: None,
            user_auth: false,
            headers: false,
            overwrite: "force".to_string(),
            port: 8800,
            host: "localhost".to_string(),
            keep_temp: false,
            no_config: false,
            only_verified_results: false,
            search_query: None,
            filter_results: None,
            yt_dlp_args: None,
        }
    }
}

/// Credential and cache settings for the catalog client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_auth: bool,
    pub cache_path: Option<PathBuf>,
    pub no_config: bool,
}
