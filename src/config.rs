//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/barfeed/config.json`, or the path given with
//! `--config <path>`.  One section per feed keeps the two binaries
//! independent while sharing a single file.
//!
//! # Example
//!
//! ```json
//! {
//!   "workspaces": { "niri_command": "niri" },
//!   "player": {
//!     "player": "spotify",
//!     "query_timeout_ms": 2000,
//!     "css_file": "/home/me/.config/waybar/spotify-albumart.css"
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workspace feed settings.
    #[serde(default)]
    pub workspaces: WorkspacesConfig,

    /// Now-playing feed settings.
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Workspace feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspacesConfig {
    /// The niri client binary.
    pub niri_command: String,
}

impl Default for WorkspacesConfig {
    fn default() -> Self {
        Self {
            niri_command: "niri".into(),
        }
    }
}

/// Now-playing feed settings.
///
/// Durations are in **milliseconds**.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// The playerctl binary.
    pub playerctl_command: String,
    /// MPRIS player name passed to `playerctl -p`.
    pub player: String,
    /// Upper bound for every playerctl query (ms).
    pub query_timeout_ms: u64,
    /// Upper bound for downloading album art (ms).
    pub download_timeout_ms: u64,
    /// Directory holding cached album art, one file per art URL.
    pub cache_dir: PathBuf,
    /// Generated stylesheet fragment.
    pub css_file: PathBuf,
    /// Holds the last-seen track id.
    pub state_file: PathBuf,
    /// Append-only log of album-art activity.
    pub log_file: PathBuf,
    /// CSS selector the stylesheet fragment targets.
    pub selector: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let cache = base_dir(dirs::cache_dir(), ".cache").join("waybar");
        let config = base_dir(dirs::config_dir(), ".config").join("waybar");
        Self {
            playerctl_command: "playerctl".into(),
            player: "spotify".into(),
            query_timeout_ms: 2000,
            download_timeout_ms: 10_000,
            cache_dir: cache.join("albumart"),
            css_file: config.join("spotify-albumart.css"),
            state_file: cache.join("spotify-current.txt"),
            log_file: cache.join("spotify-art.log"),
            selector: "#custom-spotify-art".into(),
        }
    }
}

impl PlayerConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }
}

/// `dir` if known, else `$HOME/<fallback>`, else `/tmp`.
fn base_dir(dir: Option<PathBuf>, fallback: &str) -> PathBuf {
    dir.or_else(|| dirs::home_dir().map(|h| h.join(fallback)))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/barfeed/config.json`.
    pub fn default_path() -> PathBuf {
        base_dir(dirs::config_dir(), ".config")
            .join("barfeed")
            .join("config.json")
    }

    /// Load from `--config <path>` if present in `args`, else from
    /// [`default_path`](Self::default_path), falling back to compiled-in
    /// defaults when the file is missing or invalid.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut args = args.into_iter();
        let mut path = None;
        while let Some(arg) = args.next() {
            if arg == "--config" {
                path = args.next().map(PathBuf::from);
            } else if let Some(p) = arg.strip_prefix("--config=") {
                path = Some(PathBuf::from(p));
            }
        }
        let path = path.unwrap_or_else(Self::default_path);
        match Self::load(&path) {
            Ok(cfg) => {
                log::info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::info!("no config file ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
