pub mod add;
pub mod check;
pub mod menu;
pub mod output;
pub mod watch;

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use tracing::warn;

use livecheck::http_client::build_client;
use livecheck::live::{Coordinator, Providers, TwitchProvider, YouTubeProvider};
use livecheck::{ChannelStore, Config, Credentials, Platform, Player, SelectionMode};

/// Which platforms a check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    Youtube,
    Twitch,
    Both,
}

impl Scope {
    pub fn platform(self) -> Option<Platform> {
        match self {
            Self::Youtube => Some(Platform::YouTube),
            Self::Twitch => Some(Platform::Twitch),
            Self::Both => None,
        }
    }

    pub fn selection_mode(self) -> SelectionMode {
        match self {
            Self::Youtube => SelectionMode::YouTube,
            Self::Twitch => SelectionMode::Twitch,
            Self::Both => SelectionMode::Either,
        }
    }
}

/// Everything a command needs, built once at startup.
pub struct App {
    pub store: ChannelStore,
    pub coordinator: Coordinator,
    pub youtube: Arc<YouTubeProvider>,
    pub player: Player,
}

impl App {
    pub fn new(config: &Config, credentials: &Credentials) -> Result<Self> {
        let http = build_client()?;

        let youtube = Arc::new(
            YouTubeProvider::new(http.clone(), credentials.youtube_api_key.clone())
                .with_base_url(config.youtube_api_base.clone()),
        );
        let twitch = Arc::new(
            TwitchProvider::new(
                http,
                credentials.twitch_client_id.clone(),
                credentials.twitch_oauth_token.clone(),
            )
            .with_base_url(config.twitch_api_base.clone()),
        );

        let coordinator = Coordinator::new(Providers::new(youtube.clone(), twitch))
            .with_max_concurrency(config.max_concurrency)
            .with_lookup_timeout(config.lookup_timeout());

        let player = Player::new(&config.player).with_extra_args(config.player_args.clone());
        if !player.is_available() {
            warn!("Player '{}' not found in PATH; streams will fail to open", player.program());
        }

        Ok(Self {
            store: ChannelStore::open(config.channels_file.clone()),
            coordinator,
            youtube,
            player,
        })
    }
}

/// Print `message` and read one trimmed line from stdin.
///
/// Returns `None` at end of input.
pub fn prompt(message: &str) -> Result<Option<String>> {
    print!("{message}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
