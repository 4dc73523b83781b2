// components/engine/src/lib.rs
mod options;
mod types;
mod ytdlp;

pub use options::{ClientOptions, DownloaderOptions};
pub use types::{EngineError, Track};
pub use ytdlp::{CatalogClient, Downloader, YtDlpEngine};
