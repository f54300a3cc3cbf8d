//! **barfeed**: status feeds for waybar `custom` modules.
//!
//! Two independent feeds share this crate:
//!
//! * the **workspace feed** prints the niri workspace layout and re-prints
//!   it whenever the compositor reports a workspace change;
//! * the **player feed** prints the currently playing track once per
//!   invocation and keeps an album-art stylesheet in sync with it.
//!
//! Both write one JSON [`status::StatusLine`] per update to stdout.
//!
//! # Architecture
//!
//! The feeds are written against the traits in [`traits`]:
//!
//! * [`traits::WorkspaceSource`]: lists workspaces.
//! * [`traits::MediaPlayer`]: reports playback status and metadata.
//! * [`traits::ArtDownloader`]: fetches remote album art.
//!
//! Concrete implementations live in [`niri`] (`niri msg`), [`playerctl`]
//! (`playerctl`) and [`player::art`] (HTTP via `reqwest`).

pub mod config;
pub mod niri;
pub mod player;
pub mod playerctl;
pub mod process;
pub mod status;
pub mod traits;
pub mod watcher;
pub mod workspace;
