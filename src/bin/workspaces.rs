//! Entry point for the **barfeed** workspace feed.
//!
//! Prints the current niri workspace layout, then follows
//! `niri msg -j event-stream` and prints a fresh layout after every
//! workspace change.  Exits when the event stream ends.

use barfeed::config::Config;
use barfeed::niri::msg::NiriCli;
use barfeed::watcher::{WatchError, WorkspaceWatcher};
use log::{error, info};
use std::io::BufReader;

fn main() {
    env_logger::init();

    let config = Config::from_args(std::env::args().skip(1));
    let niri = NiriCli::new(config.workspaces.niri_command.clone());

    let stdout = std::io::stdout().lock();
    let mut watcher = WorkspaceWatcher::new(niri.clone(), stdout);

    if let Err(e) = watcher.emit() {
        error!("initial snapshot failed: {}", e);
        std::process::exit(1);
    }

    let mut events = match niri.event_stream() {
        Ok(child) => child,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let Some(stream) = events.stdout.take() else {
        error!("event stream has no stdout");
        let _ = events.kill();
        std::process::exit(1);
    };

    let result = watcher.watch(BufReader::new(stream));
    let _ = events.kill();
    let _ = events.wait();

    match result {
        Ok(()) => info!("exiting"),
        Err(WatchError::Output(e)) => info!("stdout closed ({}), exiting", e),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
