//! YouTube live provider (Data API v3 search endpoint)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::channel::{ChannelEntry, Platform};
use crate::error::LookupError;
use crate::live::provider::{ensure_platform, LiveProvider, LiveStatus};

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Upper bound on live candidates requested per channel; only the first is used.
const MAX_LIVE_RESULTS: &str = "5";

pub struct YouTubeProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeProvider {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: YOUTUBE_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root (proxy or test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Look up a channel ID by free-text name.
    ///
    /// Returns the first matching channel, or `None` when the search comes
    /// back empty.
    pub async fn resolve_channel_id(&self, query: &str) -> Result<Option<String>, LookupError> {
        if query.trim().is_empty() {
            return Err(LookupError::InvalidEntry("empty channel name".into()));
        }
        let body = self
            .search(&[("part", "snippet"), ("q", query.trim()), ("type", "channel")])
            .await?;
        parse_channel_search(&body)
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<String, LookupError> {
        let url = format!("{}/search", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .header("Accept", "application/json")
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
        Ok(body)
    }
}

#[async_trait]
impl LiveProvider for YouTubeProvider {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn lookup(&self, entry: &ChannelEntry) -> Result<LiveStatus, LookupError> {
        ensure_platform(entry, Platform::YouTube)?;
        let channel_id = entry.provider_id().ok_or_else(|| {
            LookupError::InvalidEntry(format!("'{}' has no YouTube channel ID", entry.name))
        })?;

        debug!("Searching YouTube live videos for {} ({channel_id})", entry.name);
        let body = self
            .search(&[
                ("part", "id,snippet"),
                ("channelId", channel_id),
                ("eventType", "live"),
                ("type", "video"),
                ("maxResults", MAX_LIVE_RESULTS),
            ])
            .await?;

        parse_live_search(entry, &body)
    }
}

/// Map a live-video search response onto a status. The first item wins.
fn parse_live_search(entry: &ChannelEntry, body: &str) -> Result<LiveStatus, LookupError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    let Some(item) = response.items.into_iter().next() else {
        return Ok(LiveStatus::offline(entry));
    };

    let video_id = item
        .id
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LookupError::MalformedResponse("live item without videoId".into()))?;

    let (title, started_at) = match item.snippet {
        Some(snippet) => {
            let started_at = snippet
                .published_at
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(parse_timestamp)
                .transpose()?;
            (snippet.title, started_at)
        }
        None => (None, None),
    };

    Ok(LiveStatus {
        channel_name: entry.name.clone(),
        platform: Platform::YouTube,
        is_live: true,
        title,
        watch_token: Some(video_id),
        started_at,
    })
}

fn parse_channel_search(body: &str) -> Result<Option<String>, LookupError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    let non_empty = |id: &String| !id.is_empty();
    Ok(response.items.into_iter().find_map(|item| {
        item.id
            .channel_id
            .filter(non_empty)
            .or_else(|| item.snippet.and_then(|s| s.channel_id).filter(non_empty))
    }))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, LookupError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| LookupError::MalformedResponse(format!("bad timestamp {s:?}: {e}")))
}

// Serde structures for YouTube search responses

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    title: Option<String>,
    published_at: Option<String>,
    channel_id: Option<String>,
}
