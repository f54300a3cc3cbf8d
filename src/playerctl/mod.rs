//! [`MediaPlayer`] implementation backed by the `playerctl` utility.
//!
//! Every query runs `playerctl -p <player> …` with the configured timeout.
//! A non-zero exit, a timeout, or a missing binary all surface as
//! [`PlayerctlError`]; callers treat any of them as "player unavailable".

use crate::process::{self, ProcessError};
use crate::traits::MediaPlayer;
use std::fmt;
use std::time::Duration;

/// Playback status as printed by `playerctl status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
    /// Anything else, kept verbatim.
    Other(String),
}

impl PlaybackStatus {
    /// Parse the (case-insensitive) status word.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "playing" => PlaybackStatus::Playing,
            "paused" => PlaybackStatus::Paused,
            "stopped" => PlaybackStatus::Stopped,
            _ => PlaybackStatus::Other(trimmed.to_string()),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Playing => write!(f, "Playing"),
            PlaybackStatus::Paused => write!(f, "Paused"),
            PlaybackStatus::Stopped => write!(f, "Stopped"),
            PlaybackStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Errors from a `playerctl` query.
#[derive(Debug, thiserror::Error)]
#[error("playerctl query failed: {0}")]
pub struct PlayerctlError(#[from] ProcessError);

/// A single MPRIS player addressed through `playerctl -p <player>`.
pub struct Playerctl {
    program: String,
    player: String,
    timeout: Duration,
}

impl Playerctl {
    pub fn new(program: impl Into<String>, player: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            player: player.into(),
            timeout,
        }
    }

    fn query(&self, args: &[&str]) -> Result<String, PlayerctlError> {
        let mut full = vec!["-p", self.player.as_str()];
        full.extend_from_slice(args);
        let out = process::run(&self.program, &full, Some(self.timeout))?;
        Ok(out.trim().to_string())
    }
}

impl MediaPlayer for Playerctl {
    type Error = PlayerctlError;

    fn status(&self) -> Result<PlaybackStatus, PlayerctlError> {
        self.query(&["status"]).map(|s| PlaybackStatus::parse(&s))
    }

    fn metadata(&self, key: &str) -> Result<String, PlayerctlError> {
        self.query(&["metadata", key])
    }
}
