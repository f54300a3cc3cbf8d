//! Album-art cache.
//!
//! A flat directory of images named after the MD5 of their art URL:
//!
//! ```text
//! ~/.cache/waybar/albumart/
//!   3f2a…9c.jpg
//!   b07e…41.jpg
//! ```
//!
//! An existing file is a cache hit; nothing is ever evicted.  `file://`
//! URLs are copied, everything else goes through an [`ArtDownloader`].

use crate::player::artlog::ArtLog;
use crate::traits::ArtDownloader;
use md5::{Digest, Md5};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors while filling a cache entry.
#[derive(Debug, thiserror::Error)]
pub enum ArtError {
    #[error("copy from {path}: {source}")]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("download failed: {0}")]
    Download(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cache file name for `url`: lowercase hex MD5 plus `.jpg`.
pub fn cache_file_name(url: &str) -> String {
    let digest = Md5::digest(url.as_bytes());
    let mut name = String::with_capacity(36);
    for byte in digest.iter() {
        name.push_str(&format!("{:02x}", byte));
    }
    name.push_str(".jpg");
    name
}

/// First `n` characters of `s`.
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Maps art URLs to local files, fetching on a miss.
pub struct AlbumArtCache<D: ArtDownloader> {
    dir: PathBuf,
    downloader: D,
}

impl<D: ArtDownloader> AlbumArtCache<D> {
    /// Create a cache rooted at `dir`.  The directory is created lazily by
    /// the caller; see [`ensure_dir`](Self::ensure_dir).
    pub fn new(dir: impl AsRef<Path>, downloader: D) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            downloader,
        }
    }

    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Path the art for `url` is (or would be) cached at.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(cache_file_name(url))
    }

    /// Local path for `url`, fetching it first if it is not cached.
    ///
    /// An empty URL means the track has no art.  Fetch failures are logged
    /// to `log` and also yield `None`.
    pub fn get(&self, url: &str, log: &ArtLog) -> Option<PathBuf> {
        if url.is_empty() {
            return None;
        }
        match self.fetch(url, log) {
            Ok(path) => Some(path),
            Err(e) => {
                log.write(&format!("Error getting album art: {}", e));
                None
            }
        }
    }

    fn fetch(&self, url: &str, log: &ArtLog) -> Result<PathBuf, ArtError> {
        let dest = self.path_for(url);
        if dest.exists() {
            return Ok(dest);
        }

        log.write(&format!("Downloading: {}...", prefix(url, 50)));

        // Fill a sibling file and rename it into place so a failure never
        // leaves a truncated file that later reads as a cache hit.
        let partial = dest.with_extension("jpg.part");
        let filled = match url.strip_prefix("file://") {
            Some(local) => std::fs::copy(local, &partial)
                .map(|_| ())
                .map_err(|source| ArtError::Copy {
                    path: PathBuf::from(local),
                    source,
                }),
            None => self
                .downloader
                .download(url, &partial)
                .map_err(|e| ArtError::Download(e.to_string())),
        };
        if let Err(e) = filled {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
        std::fs::rename(&partial, &dest)?;
        Ok(dest)
    }
}

/// [`ArtDownloader`] over HTTP(S) using a blocking `reqwest` client.
///
/// A client that could not be built is kept as its error; every download
/// then fails with it, which the cache logs as "no art".
pub struct HttpDownloader {
    client: Result<reqwest::blocking::Client, String>,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string());
        if let Err(e) = &client {
            log::warn!("http client unavailable, album art disabled: {}", e);
        }
        Self { client }
    }
}

/// Errors from [`HttpDownloader`].
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("http client unavailable: {0}")]
    Client(String),
    #[error("http error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtDownloader for HttpDownloader {
    type Error = HttpError;

    fn download(&self, url: &str, dest: &Path) -> Result<(), HttpError> {
        let client = self
            .client
            .as_ref()
            .map_err(|e| HttpError::Client(e.clone()))?;
        let response = client.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;
        std::fs::write(dest, &body)?;
        Ok(())
    }
}

//  Tests
