//! Cached downloads of dataset and reference files.
//!
//! A [`FetchRequest`] names a URL and a cache directory; [`CachedFetcher`]
//! returns the cached copy when present and downloads it otherwise.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use gbench_model::FileFormat;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::compression::partial_path;
use crate::error::{IngestError, Result};

/// User agent string for download requests.
const USER_AGENT_VALUE: &str = concat!("gbench/", env!("CARGO_PKG_VERSION"));

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

const LOCAL_SCHEME: &str = "file://";

/// One file to place in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub cache_dir: PathBuf,
    /// Preferred cache file name; defaults to the last URL segment.
    pub file_name: Option<String>,
    /// Replaces the extension of the cache file name when set.
    pub format: Option<FileFormat>,
    /// Download even when a cached copy exists.
    pub force: bool,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            cache_dir: cache_dir.into(),
            file_name: None,
            format: None,
            force: false,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Where the fetched file lives in the cache.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(cache_file_name(
            &self.url,
            self.file_name.as_deref(),
            self.format,
        ))
    }
}

/// Cache file name for a URL.
///
/// Uses `file_name`, else the last URL path segment. An empty segment or one
/// carrying a query string is replaced by the sha256 hex of the URL. When a
/// format is given the existing extension is swapped for it.
pub fn cache_file_name(url: &str, file_name: Option<&str>, format: Option<FileFormat>) -> String {
    let candidate = file_name
        .map(str::to_string)
        .unwrap_or_else(|| url.rsplit('/').next().unwrap_or_default().to_string());
    let stem = if candidate.is_empty() || candidate.contains('?') {
        hex::encode(Sha256::digest(url.as_bytes()))
    } else {
        candidate
    };

    match format {
        Some(format) => {
            let base = Path::new(&stem)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&stem);
            format!("{base}.{}", format.extension())
        }
        None => stem,
    }
}

/// Source of local copies of remote files.
pub trait Fetcher {
    /// Return a local path holding the requested file.
    fn resolve(&self, request: &FetchRequest) -> Result<PathBuf>;
}

/// Retry and display settings for [`CachedFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total attempts per request, at least one.
    pub attempts: u32,
    /// Delay before retry `n` is `backoff * n`.
    pub backoff: Duration,
    pub show_progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(2),
            show_progress: true,
        }
    }
}

/// Fetcher backed by a directory cache and a blocking HTTP client.
///
/// `file://` URLs are copied instead of downloaded.
pub struct CachedFetcher {
    client: Client,
    config: FetchConfig,
}

impl CachedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| IngestError::Network {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    fn download(&self, url: &str, target: &Path) -> Result<()> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.download_once(url, target) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < attempts && is_retryable(&err) => {
                    let delay = self.config.backoff * attempt;
                    warn!(url, attempt, error = %err, "download failed, retrying in {delay:?}");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn download_once(&self, url: &str, target: &Path) -> Result<()> {
        info!(url, target = %target.display(), "downloading");
        let mut response = self.client.get(url).send().map_err(|e| network(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let progress = self.progress_bar(response.content_length());
        let partial = partial_path(target);
        let file = File::create(&partial).map_err(|e| IngestError::write(&partial, e))?;
        let mut writer = progress.wrap_write(BufWriter::new(file));
        let copied = std::io::copy(&mut response, &mut writer);
        progress.finish_and_clear();
        let bytes = copied.map_err(|e| IngestError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        writer
            .flush()
            .map_err(|e| IngestError::write(&partial, e))?;
        drop(writer);

        std::fs::rename(&partial, target).map_err(|e| IngestError::write(target, e))?;
        info!(url, bytes, "download complete");
        Ok(())
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let bar = match total {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::no_length(),
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec})",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

impl Fetcher for CachedFetcher {
    fn resolve(&self, request: &FetchRequest) -> Result<PathBuf> {
        let target = request.cache_path();
        if !request.force && target.exists() {
            debug!(path = %target.display(), "using cached file");
            return Ok(target);
        }

        std::fs::create_dir_all(&request.cache_dir)
            .map_err(|e| IngestError::write(&request.cache_dir, e))?;

        match request.url.strip_prefix(LOCAL_SCHEME) {
            Some(source) => {
                let source = Path::new(source);
                std::fs::copy(source, &target).map_err(|e| IngestError::read(source, e))?;
            }
            None => self.download(&request.url, &target)?,
        }
        Ok(target)
    }
}

fn network(url: &str, err: &reqwest::Error) -> IngestError {
    IngestError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Network failures and server errors are retried; client errors are not.
fn is_retryable(err: &IngestError) -> bool {
    match err {
        IngestError::Network { .. } => true,
        IngestError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
        _ => false,
    }
}
