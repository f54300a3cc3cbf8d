//! Append-only activity log for album-art handling.
//!
//! Each entry is one line, `[YYYY-mm-dd HH:MM:SS] message`, in local time.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A plain-text log file that is only ever appended to.
///
/// Write failures are swallowed: an unwritable log must never change what
/// the feed prints.
#[derive(Debug, Clone)]
pub struct ArtLog {
    path: PathBuf,
}

impl ArtLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one timestamped line.
    pub fn write(&self, message: &str) {
        log::debug!("{}", message);
        let line = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
        if let Err(e) = result {
            log::warn!("cannot append to {}: {}", self.path.display(), e);
        }
    }
}
