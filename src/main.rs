//! `livecheck` CLI - see who's live and open them in a player

mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use livecheck::{Config, Credentials, Platform};

use cmd::{App, Scope};

#[derive(Parser)]
#[command(name = "livecheck")]
#[command(about = "Check which YouTube and Twitch channels are live and watch one")]
#[command(version)]
struct Cli {
    /// Channel list (CSV: name,platform,channel_id)
    #[arg(short, long, global = true)]
    channels: Option<PathBuf>,

    /// Player executable (default: mpv)
    #[arg(short, long, global = true)]
    player: Option<String>,

    /// Config file (default: ~/.config/livecheck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu (default)
    Menu,

    /// Check who is live
    Check {
        /// Which platform to check
        #[arg(long, value_enum, default_value = "both")]
        platform: Scope,

        /// Print the report without asking who to watch
        #[arg(long)]
        no_prompt: bool,
    },

    /// Add a channel to the list
    Add {
        /// Channel name (Twitch login for Twitch channels)
        name: String,

        /// Platform the channel streams on
        #[arg(long, value_parser = parse_platform)]
        platform: Platform,

        /// YouTube channel ID (looked up by name when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Open a channel from the list in the player
    Watch {
        /// Channel name as it appears in the list
        name: String,
    },
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,livecheck={level}")));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(channels) = cli.channels {
        config.channels_file = channels;
    }
    if let Some(player) = cli.player {
        config.player = player;
    }

    let credentials = Credentials::from_env()?;
    let app = App::new(&config, &credentials)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd::menu::cmd_menu(&app).await?,
        Commands::Check { platform, no_prompt } => {
            cmd::check::cmd_check(&app, platform, !no_prompt).await?;
        }
        Commands::Add { name, platform, id } => {
            cmd::add::cmd_add(&app, &name, platform, id.as_deref()).await?;
        }
        Commands::Watch { name } => cmd::watch::cmd_watch(&app, &name).await?,
    }

    Ok(())
}
