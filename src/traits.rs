//! Traits that decouple the feeds from the concrete tools they query.
//!
//! The formatting and refresh logic only talks to these abstractions; the
//! [`niri`](crate::niri) and [`playerctl`](crate::playerctl) modules provide
//! the command-line backed implementations, and tests provide mocks.

use crate::playerctl::PlaybackStatus;
use crate::workspace::Workspace;
use std::path::Path;

/// Something that can list the current workspaces.
///
/// The watcher calls this on every refresh; it never trusts event payloads.
pub trait WorkspaceSource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Return the full, current workspace set.
    fn workspaces(&self) -> Result<Vec<Workspace>, Self::Error>;
}

/// A media player that can report playback status and track metadata.
pub trait MediaPlayer {
    /// The error type produced by this player.
    type Error: std::error::Error + Send + 'static;

    /// Current playback status.  An error means the player is unavailable.
    fn status(&self) -> Result<PlaybackStatus, Self::Error>;

    /// Look up a single metadata value (`title`, `artist`, `mpris:trackid`,
    /// `mpris:artUrl`, …).  An unknown key yields an empty string or an
    /// error depending on the backend.
    fn metadata(&self, key: &str) -> Result<String, Self::Error>;
}

/// Fetches a remote album-art URL into a local file.
pub trait ArtDownloader {
    type Error: std::error::Error + Send + 'static;

    /// Download `url` and write the body to `dest`.
    fn download(&self, url: &str, dest: &Path) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    //  Mock WorkspaceSource

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    struct MockSource {
        snapshots: RefCell<Vec<Vec<Workspace>>>,
    }

    impl WorkspaceSource for MockSource {
        type Error = MockError;

        fn workspaces(&self) -> Result<Vec<Workspace>, MockError> {
            self.snapshots.borrow_mut().pop().ok_or(MockError)
        }
    }

    #[test]
    fn mock_source_yields_snapshots_then_errors() {
        let src = MockSource {
            snapshots: RefCell::new(vec![vec![Workspace {
                output: "MOCK-1".into(),
                idx: 1,
                name: None,
                is_focused: true,
                is_active: true,
            }]]),
        };
        assert_eq!(src.workspaces().unwrap().len(), 1);
        assert!(src.workspaces().is_err());
    }

    //  Mock MediaPlayer

    struct MockPlayer;

    impl MediaPlayer for MockPlayer {
        type Error = MockError;

        fn status(&self) -> Result<PlaybackStatus, MockError> {
            Ok(PlaybackStatus::Paused)
        }

        fn metadata(&self, key: &str) -> Result<String, MockError> {
            match key {
                "title" => Ok("Song".into()),
                _ => Err(MockError),
            }
        }
    }

    #[test]
    fn mock_player_reports_metadata() {
        let p = MockPlayer;
        assert_eq!(p.status().unwrap(), PlaybackStatus::Paused);
        assert_eq!(p.metadata("title").unwrap(), "Song");
        assert!(p.metadata("artist").is_err());
    }
}
