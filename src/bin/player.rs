//! Entry point for the **barfeed** player feed.
//!
//! Prints one status line for the configured MPRIS player and exits.
//! Always exits 0; failures are encoded in the printed line.

use barfeed::config::Config;
use barfeed::player::art::HttpDownloader;
use barfeed::player::reporter::PlayerReporter;
use barfeed::playerctl::Playerctl;
use log::error;

fn main() {
    env_logger::init();

    let config = Config::from_args(std::env::args().skip(1)).player;

    let player = Playerctl::new(
        config.playerctl_command.clone(),
        config.player.clone(),
        config.query_timeout(),
    );
    let downloader = HttpDownloader::new(config.download_timeout());
    let line = PlayerReporter::new(player, downloader, &config).report();

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = line.write_line(&mut stdout) {
        error!("failed to write status line: {}", e);
    }
}
