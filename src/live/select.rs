//! Turning a requested channel name into a playable URL.

use std::fmt;

use url::Url;

use crate::channel::Platform;
use crate::error::SelectionError;
use crate::live::aggregate::LiveSet;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";
const TWITCH_BASE_URL: &str = "https://twitch.tv";

/// Which platforms a selection may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Only channels verified live on YouTube.
    YouTube,
    /// Any name, opened as a Twitch channel page.
    Twitch,
    /// YouTube if the name is in the live set, otherwise Twitch.
    Either,
}

/// A URL ready to hand to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableUrl {
    pub url: String,
    pub platform: Platform,
    /// `false` when the URL was built without confirming the channel is live.
    pub verified: bool,
}

impl fmt::Display for PlayableUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Resolve `requested` against this round's live set.
///
/// Names in the live set always win, so a channel live on both platforms
/// opens on YouTube. Outside the live set, `Twitch` and `Either` fall back
/// to the Twitch channel page by login; `YouTube` has no fallback.
pub fn resolve(
    live_set: &LiveSet,
    requested: &str,
    mode: SelectionMode,
) -> Result<PlayableUrl, SelectionError> {
    let name = requested.trim();
    if name.is_empty() {
        return Err(SelectionError::EmptyName);
    }

    if mode != SelectionMode::Twitch {
        if let Some(token) = live_set.get(name) {
            return Ok(PlayableUrl {
                url: youtube_watch_url(token),
                platform: Platform::YouTube,
                verified: true,
            });
        }
    }

    match mode {
        SelectionMode::YouTube => Err(SelectionError::NotFound(name.to_string())),
        SelectionMode::Twitch | SelectionMode::Either => Ok(twitch_fallback(name)),
    }
}

/// Twitch channel page for `login`, not checked for liveness.
pub fn twitch_fallback(login: &str) -> PlayableUrl {
    PlayableUrl {
        url: twitch_channel_url(login),
        platform: Platform::Twitch,
        verified: false,
    }
}

pub fn youtube_watch_url(video_id: &str) -> String {
    Url::parse_with_params(YOUTUBE_WATCH_URL, &[("v", video_id)])
        .map_or_else(|_| format!("{YOUTUBE_WATCH_URL}?v={video_id}"), String::from)
}

pub fn twitch_channel_url(login: &str) -> String {
    match Url::parse(TWITCH_BASE_URL) {
        Ok(mut url) => {
            url.set_path(login);
            url.into()
        }
        Err(_) => format!("{TWITCH_BASE_URL}/{login}"),
    }
}
