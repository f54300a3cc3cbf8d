//! The now-playing feed: one status line per invocation.
//!
//! ```text
//! status ──fail──▶ fallback line
//!    │
//!    ▼
//! title, artist, track id
//!    │
//!    ├─ same track as last time ──▶ status line
//!    │
//!    └─ new track ─▶ album art ─▶ stylesheet ─▶ store track id ─▶ status line
//! ```

use crate::config::PlayerConfig;
use crate::player::art::AlbumArtCache;
use crate::player::artlog::ArtLog;
use crate::player::stylesheet::write_stylesheet;
use crate::player::track::TrackState;
use crate::status::StatusLine;
use crate::traits::{ArtDownloader, MediaPlayer};
use log::{debug, info};
use std::path::PathBuf;

/// Maximum number of characters of the title shown in the bar.
pub const TEXT_MAX_CHARS: usize = 30;

/// The line printed whenever nothing (or nothing usable) is playing.
pub fn not_playing() -> StatusLine {
    StatusLine::new("", "No music playing", "stopped")
}

/// Escape the characters Pango markup treats specially.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Errors in the refresh path.  All of them end in the fallback line.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write stylesheet {path}: {source}")]
    Stylesheet {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to store track id in {path}: {source}")]
    TrackState {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Playback snapshot for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub playing: bool,
}

impl PlayerState {
    pub fn status_line(&self) -> StatusLine {
        let text: String = self.title.chars().take(TEXT_MAX_CHARS).collect();
        let tooltip = format!(
            "<b>{}</b>\n{}",
            escape_markup(&self.title),
            escape_markup(&self.artist)
        );
        let class = if self.playing { "playing" } else { "paused" };
        StatusLine::new(text, tooltip, class)
    }
}

/// Builds the now-playing status line and keeps the album-art stylesheet in
/// sync with the current track.
pub struct PlayerReporter<P: MediaPlayer, D: ArtDownloader> {
    player: P,
    cache: AlbumArtCache<D>,
    track: TrackState,
    log: ArtLog,
    css_file: PathBuf,
    selector: String,
}

impl<P: MediaPlayer, D: ArtDownloader> PlayerReporter<P, D> {
    pub fn new(player: P, downloader: D, config: &PlayerConfig) -> Self {
        Self {
            player,
            cache: AlbumArtCache::new(&config.cache_dir, downloader),
            track: TrackState::new(&config.state_file),
            log: ArtLog::new(&config.log_file),
            css_file: config.css_file.clone(),
            selector: config.selector.clone(),
        }
    }

    /// Produce the status line.  Never fails: an unavailable player or an
    /// error while refreshing the art yields [`not_playing`].
    pub fn report(&self) -> StatusLine {
        match self.try_report() {
            Ok(Some(line)) => line,
            Ok(None) => not_playing(),
            Err(e) => {
                self.log.write(&format!("Error: {}", e));
                not_playing()
            }
        }
    }

    /// `Ok(None)` when the player is unavailable.
    pub fn try_report(&self) -> Result<Option<StatusLine>, ReportError> {
        let status = match self.player.status() {
            Ok(status) => status,
            Err(e) => {
                debug!("player unavailable: {}", e);
                return Ok(None);
            }
        };

        let state = PlayerState {
            title: self.metadata_or_empty("title"),
            artist: self.metadata_or_empty("artist"),
            playing: status.is_playing(),
            track_id: self.metadata_or_empty("mpris:trackid"),
        };

        if self.track.changed(&state.track_id) {
            self.refresh_art(&state)?;
        }

        Ok(Some(state.status_line()))
    }

    /// Fetch art for the new track, rewrite the stylesheet and remember the
    /// track id.
    fn refresh_art(&self, state: &PlayerState) -> Result<(), ReportError> {
        info!("track changed to {:?}", state.track_id);
        self.log
            .write(&format!("Track changed: {} - {}", state.artist, state.title));

        if let Err(e) = self.cache.ensure_dir() {
            self.log.write(&format!("Error creating art cache: {}", e));
        }
        let art = match self.player.metadata("mpris:artUrl") {
            Ok(url) => self.cache.get(&url, &self.log),
            Err(e) => {
                self.log.write(&format!("Error getting album art: {}", e));
                None
            }
        };

        write_stylesheet(&self.css_file, &self.selector, art.as_deref(), &self.log).map_err(
            |source| ReportError::Stylesheet {
                path: self.css_file.clone(),
                source,
            },
        )?;

        self.track
            .store(&state.track_id)
            .map_err(|source| ReportError::TrackState {
                path: self.track.path().to_path_buf(),
                source,
            })
    }

    /// Metadata lookups that fail read as empty, like a missing tag.
    fn metadata_or_empty(&self, key: &str) -> String {
        self.player.metadata(key).unwrap_or_else(|e| {
            debug!("metadata {} unavailable: {}", key, e);
            String::new()
        })
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playerctl::PlaybackStatus;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    #[derive(Debug, thiserror::Error)]
    #[error("mock failure")]
    struct MockError;

    /// A player whose status and metadata can be changed between reports.
    #[derive(Default)]
    struct MockPlayer {
        status: RefCell<Option<PlaybackStatus>>,
        metadata: RefCell<HashMap<String, String>>,
    }

    impl MockPlayer {
        fn playing(track: &str, title: &str, artist: &str, art: &str) -> Self {
            let p = MockPlayer::default();
            p.set_track(track, title, artist, art);
            *p.status.borrow_mut() = Some(PlaybackStatus::Playing);
            p
        }

        fn set_track(&self, track: &str, title: &str, artist: &str, art: &str) {
            let mut m = self.metadata.borrow_mut();
            m.insert("mpris:trackid".into(), track.into());
            m.insert("title".into(), title.into());
            m.insert("artist".into(), artist.into());
            m.insert("mpris:artUrl".into(), art.into());
        }
    }

    impl MediaPlayer for &MockPlayer {
        type Error = MockError;

        fn status(&self) -> Result<PlaybackStatus, MockError> {
            self.status.borrow().clone().ok_or(MockError)
        }

        fn metadata(&self, key: &str) -> Result<String, MockError> {
            self.metadata.borrow().get(key).cloned().ok_or(MockError)
        }
    }

    struct MockDownloader {
        calls: Cell<usize>,
    }

    impl ArtDownloader for &MockDownloader {
        type Error = MockError;

        fn download(&self, _url: &str, dest: &Path) -> Result<(), MockError> {
            self.calls.set(self.calls.get() + 1);
            std::fs::write(dest, b"jpeg").map_err(|_| MockError)
        }
    }

    fn test_config() -> PlayerConfig {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "barfeed-reporter-{}-{}",
            std::process::id(),
            id
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        PlayerConfig {
            cache_dir: root.join("albumart"),
            css_file: root.join("art.css"),
            state_file: root.join("current.txt"),
            log_file: root.join("art.log"),
            ..PlayerConfig::default()
        }
    }

    fn cleanup(cfg: &PlayerConfig) {
        if let Some(root) = cfg.css_file.parent() {
            let _ = std::fs::remove_dir_all(root);
        }
    }

    #[test]
    fn unavailable_player_yields_fallback() {
        let cfg = test_config();
        let player = MockPlayer::default();
        let dl = MockDownloader { calls: Cell::new(0) };
        let reporter = PlayerReporter::new(&player, &dl, &cfg);
        let line = reporter.report();
        assert_eq!(
            line.to_json(),
            r#"{"text": "", "tooltip": "No music playing", "class": "stopped"}"#
        );
        assert!(!cfg.css_file.exists());
        assert!(!cfg.state_file.exists());
        cleanup(&cfg);
    }

    #[test]
    fn playing_track_line() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "");
        let dl = MockDownloader { calls: Cell::new(0) };
        let line = PlayerReporter::new(&player, &dl, &cfg).report();
        assert_eq!(line.text, "Song");
        assert_eq!(line.tooltip, "<b>Song</b>\nBand");
        assert_eq!(line.class, "playing");
        cleanup(&cfg);
    }

    #[test]
    fn paused_and_stopped_both_render_paused() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "");
        let dl = MockDownloader { calls: Cell::new(0) };
        let reporter = PlayerReporter::new(&player, &dl, &cfg);
        *player.status.borrow_mut() = Some(PlaybackStatus::Paused);
        assert_eq!(reporter.report().class, "paused");
        *player.status.borrow_mut() = Some(PlaybackStatus::Stopped);
        assert_eq!(reporter.report().class, "paused");
        cleanup(&cfg);
    }

    #[test]
    fn long_title_truncated_to_thirty_chars() {
        let cfg = test_config();
        let title = "Ünïcödé title that is definitely longer than thirty";
        let player = MockPlayer::playing("t1", title, "A & B", "");
        let dl = MockDownloader { calls: Cell::new(0) };
        let line = PlayerReporter::new(&player, &dl, &cfg).report();
        assert_eq!(line.text.chars().count(), 30);
        assert!(title.starts_with(&line.text));
        assert_eq!(line.tooltip, format!("<b>{}</b>\nA &amp; B", title));
        cleanup(&cfg);
    }

    #[test]
    fn new_track_refreshes_art_and_state() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "https://i.scdn.co/image/1");
        let dl = MockDownloader { calls: Cell::new(0) };
        PlayerReporter::new(&player, &dl, &cfg).report();

        assert_eq!(dl.calls.get(), 1);
        assert_eq!(std::fs::read_to_string(&cfg.state_file).unwrap(), "t1");
        let css = std::fs::read_to_string(&cfg.css_file).unwrap();
        assert!(css.contains("background-image: url(\"file://"));
        let log = std::fs::read_to_string(&cfg.log_file).unwrap();
        assert!(log.contains("Track changed: Band - Song"));
        assert!(log.contains("Updated CSS (ts="));
        cleanup(&cfg);
    }

    #[test]
    fn same_track_leaves_stylesheet_untouched() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "https://i.scdn.co/image/1");
        let dl = MockDownloader { calls: Cell::new(0) };
        let reporter = PlayerReporter::new(&player, &dl, &cfg);
        reporter.report();

        std::fs::write(&cfg.css_file, "sentinel").unwrap();
        let line = reporter.report();
        assert_eq!(line.class, "playing");
        assert_eq!(std::fs::read_to_string(&cfg.css_file).unwrap(), "sentinel");
        assert_eq!(dl.calls.get(), 1);
        cleanup(&cfg);
    }

    #[test]
    fn track_change_rewrites_stylesheet() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "https://i.scdn.co/image/1");
        let dl = MockDownloader { calls: Cell::new(0) };
        let reporter = PlayerReporter::new(&player, &dl, &cfg);
        reporter.report();

        std::fs::write(&cfg.css_file, "sentinel").unwrap();
        player.set_track("t2", "Other", "Band", "https://i.scdn.co/image/2");
        reporter.report();
        assert_ne!(std::fs::read_to_string(&cfg.css_file).unwrap(), "sentinel");
        assert_eq!(std::fs::read_to_string(&cfg.state_file).unwrap(), "t2");
        assert_eq!(dl.calls.get(), 2);
        cleanup(&cfg);
    }

    #[test]
    fn returning_to_cached_art_does_not_download_again() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "https://i.scdn.co/image/1");
        let dl = MockDownloader { calls: Cell::new(0) };
        let reporter = PlayerReporter::new(&player, &dl, &cfg);
        reporter.report();
        player.set_track("t2", "Song 2", "Band", "https://i.scdn.co/image/1");
        reporter.report();
        assert_eq!(dl.calls.get(), 1);
        cleanup(&cfg);
    }

    #[test]
    fn track_without_art_clears_background() {
        let cfg = test_config();
        let player = MockPlayer::playing("t1", "Song", "Band", "");
        let dl = MockDownloader { calls: Cell::new(0) };
        PlayerReporter::new(&player, &dl, &cfg).report();
        let css = std::fs::read_to_string(&cfg.css_file).unwrap();
        assert!(css.contains("background-image: none;"));
        assert_eq!(dl.calls.get(), 0);
        cleanup(&cfg);
    }

    #[test]
    fn unwritable_stylesheet_yields_fallback_and_logs() {
        let mut cfg = test_config();
        let root = cfg.css_file.parent().unwrap().to_path_buf();
        cfg.css_file = root.join("missing-dir").join("art.css");
        let player = MockPlayer::playing("t1", "Song", "Band", "");
        let dl = MockDownloader { calls: Cell::new(0) };
        let line = PlayerReporter::new(&player, &dl, &cfg).report();
        assert_eq!(line, not_playing());
        let log = std::fs::read_to_string(&cfg.log_file).unwrap();
        assert!(log.contains("Error: failed to write stylesheet"));
        assert!(!cfg.state_file.exists());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn escape_markup_handles_specials() {
        assert_eq!(escape_markup("Tom & Jerry <live>"), "Tom &amp; Jerry &lt;live&gt;");
        assert_eq!(escape_markup("plain"), "plain");
    }
}
