//! Live-status resolution across streaming platforms
//!
//! Looks up every followed channel concurrently (YouTube, Twitch), folds the
//! answers into a [`LiveSet`] and resolves a chosen name into a playable URL.

pub mod aggregate;
pub mod coordinator;
pub mod provider;
pub mod providers;
pub mod select;

pub use aggregate::{aggregate, LiveSet, LookupOutcome, RoundReport};
pub use coordinator::Coordinator;
pub use provider::{LiveProvider, LiveStatus};
pub use providers::{Providers, TwitchProvider, YouTubeProvider};
pub use select::{resolve, PlayableUrl, SelectionMode};
