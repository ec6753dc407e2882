//! Channel entries and the platforms they live on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two supported streaming platforms.
///
/// YouTube channels are addressed by opaque channel ID, Twitch channels by
/// login name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Twitch,
}

impl Platform {
    /// Tag written to the channel store.
    pub fn tag(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Twitch => "twitch",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YouTube => f.write_str("YouTube"),
            Self::Twitch => f.write_str("Twitch"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" | "yt" | "a" => Ok(Self::YouTube),
            "twitch" | "ttv" | "b" => Ok(Self::Twitch),
            other => Err(format!("unknown platform '{other}' (expected youtube or twitch)")),
        }
    }
}

/// A channel the user follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    /// Display name, unique within the channel list.
    pub name: String,
    pub platform: Platform,
    /// YouTube channel ID. Twitch entries leave this empty.
    pub provider_id: Option<String>,
}

impl ChannelEntry {
    pub fn youtube(name: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: Platform::YouTube,
            provider_id: Some(channel_id.into()),
        }
    }

    pub fn twitch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: Platform::Twitch,
            provider_id: None,
        }
    }

    /// Provider ID if set and non-blank.
    pub fn provider_id(&self) -> Option<&str> {
        self.provider_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
