// components/engine/src/ytdlp.rs
use crate::options::{ClientOptions, DownloaderOptions};
use crate::types::{EngineError, Track};
use async_trait::async_trait;
use futures::stream::{self, TryStreamExt};
use log_relay::{LogSink, StreamKind};
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

/// Resolves free-text queries and URLs into downloadable tracks.
#[async_trait]
pub trait CatalogClient {
    async fn search(&self, queries: &[String]) -> Result<Vec<Track>, EngineError>;
}

/// Fetches resolved tracks. Transcoding, tagging and retry policy live
/// behind this seam, not in front of it.
#[async_trait]
pub trait Downloader {
    async fn check_available(&self) -> Result<(), EngineError>;
    async fn download(&self, tracks: &[Track]) -> Result<(), EngineError>;
}

/// Engine backed by the external `yt-dlp` binary.
///
/// Child-process output is forwarded line by line into the [`LogSink`] so a
/// host polling the queue sees progress while a call is in flight.
pub struct YtDlpEngine {
    client: ClientOptions,
    options: DownloaderOptions,
    sink: LogSink,
}

impl YtDlpEngine {
    pub fn new(client: ClientOptions, options: DownloaderOptions, sink: LogSink) -> Self {
        Self {
            client,
            options,
            sink,
        }
    }

    /// Turn one query token into a yt-dlp target: URLs pass through,
    /// anything else becomes a single-result catalog search.
    fn search_target(query: &str) -> Result<String, EngineError> {
        if query.starts_with("http://") || query.starts_with("https://") {
            let url = Url::parse(query).map_err(|e| EngineError::InvalidUrl(e.to_string()))?;
            Ok(url.into())
        } else {
            Ok(format!("ytsearch1:{}", query))
        }
    }

    fn search_args(&self, target: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-download".to_string(),
            "--no-playlist".to_string(),
        ];
        if let Some(cache) = &self.client.cache_path {
            args.push("--cache-dir".to_string());
            args.push(cache.to_string_lossy().into_owned());
        }
        if self.client.no_config {
            args.push("--ignore-config".to_string());
        }
        args.push(target.to_string());
        args
    }

    fn download_args(&self, track: &Track) -> Vec<String> {
        let options = &self.options;
        let mut args = vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            options.format.clone(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            options.output.clone(),
        ];
        if let Some(rate) = options.constant_bitrate.as_ref().or(options.bitrate.as_ref()) {
            args.push("--audio-quality".to_string());
            args.push(rate.clone());
        }
        if options.ffmpeg != "ffmpeg" {
            args.push("--ffmpeg-location".to_string());
            args.push(options.ffmpeg.clone());
        }
        if options.sponsor_block {
            args.push("--sponsorblock-remove".to_string());
            args.push("sponsor".to_string());
        }
        if options.restrict {
            args.push("--restrict-filenames".to_string());
        }
        match options.overwrite.as_str() {
            "skip" => args.push("--no-overwrites".to_string()),
            _ => args.push("--force-overwrites".to_string()),
        }
        if let Some(cookie) = &options.set_cookie {
            args.push("--cookies".to_string());
            args.push(cookie.clone());
        }
        if options.no_config {
            args.push("--ignore-config".to_string());
        }
        if options.log_level == "DEBUG" {
            args.push("-v".to_string());
        }
        if let Some(extra) = &options.yt_dlp_args {
            args.extend(extra.split_whitespace().map(str::to_string));
        }
        args.push(track.source_url.clone());
        args
    }

    async fn download_one(&self, track: &Track) -> Result<(), EngineError> {
        info!("Downloading: {}", track.title);

        let mut child = Command::new("yt-dlp")
            .args(self.download_args(track))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            EngineError::DownloadFailed("child stdout was not captured".to_string())
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            EngineError::DownloadFailed("child stderr was not captured".to_string())
        })?;

        let out_task = tokio::spawn(forward_lines(stdout, self.sink.clone(), StreamKind::Stdout));
        let err_task = tokio::spawn(forward_lines(stderr, self.sink.clone(), StreamKind::Stderr));

        let status = child.wait().await?;
        let _ = out_task.await;
        let _ = err_task.await;

        if !status.success() {
            return Err(EngineError::DownloadFailed(format!(
                "yt-dlp exited with status {} for '{}'",
                status, track.title
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for YtDlpEngine {
    async fn search(&self, queries: &[String]) -> Result<Vec<Track>, EngineError> {
        let mut tracks = Vec::new();

        for query in queries {
            let target = Self::search_target(query)?;
            debug!("Resolving query '{}' via '{}'", query, target);

            let output = Command::new("yt-dlp")
                .args(self.search_args(&target))
                .output()
                .await?;

            for line in String::from_utf8_lossy(&output.stderr).lines() {
                self.sink.push(StreamKind::Stderr, line);
            }

            if !output.status.success() {
                return Err(EngineError::SearchFailed(format!(
                    "yt-dlp exited with status {} for query '{}'",
                    output.status, query
                )));
            }

            // One JSON object per resolved entry, one entry per line.
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let meta: YtDlpMetadata = serde_json::from_str(line)
                    .map_err(|e| EngineError::SearchFailed(e.to_string()))?;
                tracks.push(Track {
                    title: meta.title,
                    artist: meta.uploader,
                    duration: meta.duration,
                    source_url: meta.webpage_url,
                });
            }
        }

        info!("Resolved {} track(s)", tracks.len());
        Ok(tracks)
    }
}

#[async_trait]
impl Downloader for YtDlpEngine {
    async fn check_available(&self) -> Result<(), EngineError> {
        which::which("yt-dlp")
            .map(|_| ())
            .map_err(|_| EngineError::DependencyNotFound("yt-dlp"))?;
        which::which(&self.options.ffmpeg)
            .map(|_| ())
            .map_err(|_| EngineError::DependencyNotFound("ffmpeg"))
    }

    async fn download(&self, tracks: &[Track]) -> Result<(), EngineError> {
        let limit = self.options.threads.max(1);

        stream::iter(tracks.iter().map(Ok::<&Track, EngineError>))
            .try_for_each_concurrent(limit, |track| self.download_one(track))
            .await
    }
}

async fn forward_lines(
    reader: impl AsyncRead + Unpin + Send + 'static,
    sink: LogSink,
    kind: StreamKind,
) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        sink.push(kind, line);
    }
}

#[derive(Debug, Deserialize)]
struct YtDlpMetadata {
    title: String,
    uploader: Option<String>,
    #[serde(default)]
    duration: f64,
    webpage_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn engine_with(options: DownloaderOptions) -> YtDlpEngine {
        YtDlpEngine::new(ClientOptions::default(), options, LogSink::new())
    }

    #[test]
    fn test_search_target_wraps_free_text() {
        let target = YtDlpEngine::search_target("Song Name").unwrap();
        assert_eq!(target, "ytsearch1:Song Name");
    }

    #[test]
    fn test_search_target_passes_urls_through() {
        let target = YtDlpEngine::search_target("https://example.com/watch?v=1").unwrap();
        assert_eq!(target, "https://example.com/watch?v=1");
    }

    #[test]
    fn test_search_target_rejects_malformed_urls() {
        let result = YtDlpEngine::search_target("https://");
        assert_matches!(result, Err(EngineError::InvalidUrl(_)));
    }

    #[test]
    fn test_download_args_defaults() {
        let engine = engine_with(DownloaderOptions::default());
        let track = Track {
            title: "Test Song".to_string(),
            artist: None,
            duration: 180.0,
            source_url: "https://example.com/song".to_string(),
        };

        let args = engine.download_args(&track);
        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"--audio-format".to_string()));
        assert!(args.contains(&"mp3".to_string()));
        assert!(
            args.contains(&"--force-overwrites".to_string()),
            "default overwrite policy is force"
        );
        assert!(!args.contains(&"--sponsorblock-remove".to_string()));
        assert_eq!(
            args.last(),
            Some(&track.source_url),
            "the target URL should come last"
        );
    }

    #[test]
    fn test_download_args_reflect_options() {
        let options = DownloaderOptions {
            format: "flac".to_string(),
            bitrate: Some("320k".to_string()),
            sponsor_block: true,
            restrict: true,
            overwrite: "skip".to_string(),
            set_cookie: Some("/tmp/cookies.txt".to_string()),
            yt_dlp_args: Some("--no-mtime --newline".to_string()),
            ..DownloaderOptions::default()
        };
        let engine = engine_with(options);
        let track = Track {
            title: "Test Song".to_string(),
            artist: None,
            duration: 0.0,
            source_url: "https://example.com/song".to_string(),
        };

        let args = engine.download_args(&track);
        assert!(args.contains(&"flac".to_string()));
        assert!(args.contains(&"320k".to_string()));
        assert!(args.contains(&"--sponsorblock-remove".to_string()));
        assert!(args.contains(&"--restrict-filenames".to_string()));
        assert!(args.contains(&"--no-overwrites".to_string()));
        assert!(args.contains(&"--cookies".to_string()));
        assert!(args.contains(&"--no-mtime".to_string()));
        assert!(args.contains(&"--newline".to_string()));
    }

    #[test]
    fn test_constant_bitrate_wins_over_bitrate() {
        let options = DownloaderOptions {
            bitrate: Some("128k".to_string()),
            constant_bitrate: Some("320k".to_string()),
            ..DownloaderOptions::default()
        };
        let engine = engine_with(options);
        let track = Track {
            title: "Test Song".to_string(),
            artist: None,
            duration: 0.0,
            source_url: "https://example.com/song".to_string(),
        };

        let args = engine.download_args(&track);
        assert!(args.contains(&"320k".to_string()));
        assert!(!args.contains(&"128k".to_string()));
    }

    #[test]
    fn test_search_args_carry_client_settings() {
        let client = ClientOptions {
            cache_path: Some("/tmp/cache".into()),
            no_config: true,
            ..ClientOptions::default()
        };
        let engine = YtDlpEngine::new(client, DownloaderOptions::default(), LogSink::new());

        let args = engine.search_args("ytsearch1:test");
        assert!(args.contains(&"--cache-dir".to_string()));
        assert!(args.contains(&"/tmp/cache".to_string()));
        assert!(args.contains(&"--ignore-config".to_string()));
        assert_eq!(args.last(), Some(&"ytsearch1:test".to_string()));
    }
}
