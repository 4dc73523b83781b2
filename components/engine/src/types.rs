// components/engine/src/types.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A resolved search result, ready to hand to a downloader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,

    /// Uploader or channel name, when the catalog reports one
    pub artist: Option<String>,

    /// Duration in seconds
    pub duration: f64,

    /// URL the track resolves to
    pub source_url: String,
}
