//! Live provider trait and common types.
//!
//! A [`LiveProvider`] knows how to ask one streaming platform whether a
//! channel is currently live and normalizes the answer into a
//! [`LiveStatus`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::channel::{ChannelEntry, Platform};
use crate::error::LookupError;

/// Live status of one channel for one polling round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStatus {
    /// Name of the channel entry this status belongs to.
    pub channel_name: String,
    pub platform: Platform,
    pub is_live: bool,
    /// Stream title, when live.
    pub title: Option<String>,
    /// Provider-specific identifier needed to build a playable URL.
    /// YouTube fills in the video ID; Twitch leaves it empty because the
    /// channel page is addressable by login alone.
    pub watch_token: Option<String>,
    /// When the broadcast started (`None` if unknown).
    pub started_at: Option<DateTime<Utc>>,
}

impl LiveStatus {
    /// A "not live" status for `entry`.
    pub fn offline(entry: &ChannelEntry) -> Self {
        Self {
            channel_name: entry.name.clone(),
            platform: entry.platform,
            is_live: false,
            title: None,
            watch_token: None,
            started_at: None,
        }
    }
}

/// Trait for streaming platform clients.
///
/// Implementations perform exactly one request per [`lookup`](Self::lookup)
/// and have their credentials injected at construction time.
#[async_trait]
pub trait LiveProvider: Send + Sync {
    /// Platform this client talks to.
    fn platform(&self) -> Platform;

    /// Short lowercase provider name (e.g., `"youtube"`).
    fn name(&self) -> &'static str {
        self.platform().tag()
    }

    /// Check whether `entry` is live right now.
    ///
    /// Returns `Ok` with `is_live == false` when the channel is simply
    /// offline; errors are reserved for network, auth and parse faults.
    async fn lookup(&self, entry: &ChannelEntry) -> Result<LiveStatus, LookupError>;
}

/// Reject entries that belong to another platform.
pub(crate) fn ensure_platform(
    entry: &ChannelEntry,
    client: Platform,
) -> Result<(), LookupError> {
    if entry.platform == client {
        Ok(())
    } else {
        Err(LookupError::PlatformMismatch {
            entry: entry.platform,
            client,
        })
    }
}
