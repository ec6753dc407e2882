//! Streaming platform clients

pub mod twitch;
pub mod youtube;

use std::sync::Arc;

pub use twitch::TwitchProvider;
pub use youtube::YouTubeProvider;

use crate::channel::Platform;
use crate::live::provider::LiveProvider;

/// One client per platform, picked by an entry's [`Platform`] tag.
#[derive(Clone)]
pub struct Providers {
    youtube: Arc<dyn LiveProvider>,
    twitch: Arc<dyn LiveProvider>,
}

impl Providers {
    pub fn new(youtube: Arc<dyn LiveProvider>, twitch: Arc<dyn LiveProvider>) -> Self {
        Self { youtube, twitch }
    }

    pub fn for_platform(&self, platform: Platform) -> Arc<dyn LiveProvider> {
        match platform {
            Platform::YouTube => Arc::clone(&self.youtube),
            Platform::Twitch => Arc::clone(&self.twitch),
        }
    }
}
