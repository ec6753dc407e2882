//! `livecheck` - Who's live right now?
//!
//! # Features
//!
//! - **Concurrent lookups**: one task per followed channel, YouTube and Twitch
//! - **Failure isolation**: a bad response only affects its own channel
//! - **Player hand-off**: opens the chosen stream in mpv (or any player)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use livecheck::http_client::build_client;
//! use livecheck::live::{resolve, Coordinator, Providers, SelectionMode, TwitchProvider, YouTubeProvider};
//! use livecheck::ChannelEntry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http = build_client()?;
//!     let providers = Providers::new(
//!         Arc::new(YouTubeProvider::new(http.clone(), "api-key")),
//!         Arc::new(TwitchProvider::new(http, "client-id", "oauth-token")),
//!     );
//!     let entries = vec![
//!         ChannelEntry::youtube("alice", "UC123"),
//!         ChannelEntry::twitch("bob"),
//!     ];
//!     let report = Coordinator::new(providers).resolve_all(&entries).await;
//!     let url = resolve(&report.live_set, "alice", SelectionMode::Either)?;
//!     println!("{url}");
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod http_client;
pub mod live;
pub mod player;
pub mod store;

pub use channel::{ChannelEntry, Platform};
pub use config::{Config, Credentials};
pub use error::{ConfigError, LookupError, PlayerError, SelectionError, StoreError};
pub use live::{Coordinator, LiveSet, LiveStatus, PlayableUrl, RoundReport, SelectionMode};
pub use player::Player;
pub use store::ChannelStore;

/// Version of livecheck
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
