//! Twitch live provider (Helix `search/channels`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::channel::{ChannelEntry, Platform};
use crate::error::LookupError;
use crate::live::provider::{ensure_platform, LiveProvider, LiveStatus};

pub const TWITCH_API_BASE: &str = "https://api.twitch.tv/helix";

pub struct TwitchProvider {
    client: Client,
    client_id: String,
    oauth_token: String,
    base_url: String,
}

impl TwitchProvider {
    pub fn new(client: Client, client_id: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            oauth_token: oauth_token.into(),
            base_url: TWITCH_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root (proxy or test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LiveProvider for TwitchProvider {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    async fn lookup(&self, entry: &ChannelEntry) -> Result<LiveStatus, LookupError> {
        ensure_platform(entry, Platform::Twitch)?;
        let login = entry.name.trim();
        if login.is_empty() {
            return Err(LookupError::InvalidEntry("empty Twitch login".into()));
        }

        debug!("Searching Twitch channels for {login}");
        let url = format!("{}/search/channels", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("query", login)])
            .header("Client-Id", &self.client_id)
            .bearer_auth(&self.oauth_token)
            .send()
            .await
            .map_err(|e| LookupError::from_transport(&e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| LookupError::from_transport(&e))?;

        if !status.is_success() {
            return Err(LookupError::from_status(status, &body));
        }

        parse_channel_search(entry, &body)
    }
}

/// Pick the exact (case-sensitive) login match out of the search results.
fn parse_channel_search(entry: &ChannelEntry, body: &str) -> Result<LiveStatus, LookupError> {
    let response: ChannelSearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    let login = entry.name.trim();
    let Some(channel) = response
        .data
        .into_iter()
        .find(|c| c.broadcaster_login == login)
    else {
        return Ok(LiveStatus::offline(entry));
    };

    // A bad timestamp is a bad response, live or not.
    let started_at = parse_started_at(channel.started_at.as_deref())?;

    if !channel.is_live {
        return Ok(LiveStatus::offline(entry));
    }

    Ok(LiveStatus {
        channel_name: entry.name.clone(),
        platform: Platform::Twitch,
        is_live: true,
        title: Some(channel.title).filter(|t| !t.is_empty()),
        watch_token: None,
        started_at,
    })
}

/// `started_at` is absent, `null` or `""` for offline channels.
fn parse_started_at(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, LookupError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| LookupError::MalformedResponse(format!("bad started_at {s:?}: {e}"))),
    }
}

// Serde structures for Helix responses

#[derive(Debug, Deserialize)]
struct ChannelSearchResponse {
    #[serde(default)]
    data: Vec<TwitchChannel>,
}

#[derive(Debug, Deserialize)]
struct TwitchChannel {
    broadcaster_login: String,
    #[serde(default)]
    is_live: bool,
    #[serde(default)]
    title: String,
    #[serde(default)]
    started_at: Option<String>,
}
