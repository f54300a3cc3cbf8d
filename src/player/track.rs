//! Persisted last-seen track id.
//!
//! The only durable state of the now-playing feed: a one-line file holding
//! the id of the track the stylesheet was last generated for.

use std::path::{Path, PathBuf};

/// The last-seen track id, stored in a plain-text file.
#[derive(Debug, Clone)]
pub struct TrackState {
    path: PathBuf,
}

impl TrackState {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored id, trimmed.  A missing or unreadable file reads as `""`.
    pub fn last(&self) -> String {
        std::fs::read_to_string(&self.path)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// Whether `current` differs from the stored id.
    pub fn changed(&self, current: &str) -> bool {
        self.last() != current
    }

    /// Overwrite the stored id (no trailing newline).
    pub fn store(&self, track_id: &str) -> std::io::Result<()> {
        std::fs::write(&self.path, track_id)
    }
}
