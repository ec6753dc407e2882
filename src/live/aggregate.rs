//! Folding lookup outcomes into the live set for one polling round.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::channel::{ChannelEntry, Platform};
use crate::error::LookupError;
use crate::live::provider::LiveStatus;

/// What one lookup task reports back through the result channel.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    /// Position of the entry in the input list.
    pub index: usize,
    pub entry: ChannelEntry,
    pub result: Result<LiveStatus, LookupError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    index: usize,
    token: String,
}

/// Currently-live channel names mapped to their watch tokens.
///
/// A name that appears more than once keeps the token of the entry that
/// comes last in the input list, whatever order the results arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSet {
    slots: HashMap<String, Slot>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name -> token` unless an entry later in the input list
    /// already claimed the name.
    pub fn insert(&mut self, index: usize, name: impl Into<String>, token: impl Into<String>) {
        let name = name.into();
        let token = token.into();
        match self.slots.get(&name) {
            Some(existing) if existing.index > index => {}
            _ => {
                self.slots.insert(name, Slot { index, token });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(|s| s.token.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// A lookup that failed and was counted as not live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub channel_name: String,
    pub platform: Platform,
    pub error: LookupError,
}

/// Everything one polling round observed.
#[derive(Debug, Clone, Default)]
pub struct RoundReport {
    /// Number of lookups that reported back.
    pub attempted: usize,
    pub live_set: LiveSet,
    /// Live statuses in input-list order, including those without a watch token.
    pub live: Vec<LiveStatus>,
    /// Failed lookups in input-list order.
    pub failures: Vec<LookupFailure>,
}

impl RoundReport {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = LookupOutcome>,
    {
        let mut outcomes: Vec<LookupOutcome> = outcomes.into_iter().collect();
        outcomes.sort_by_key(|o| o.index);

        let mut report = Self {
            attempted: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome.result {
                Ok(status) if status.is_live => {
                    if let Some(token) = &status.watch_token {
                        report
                            .live_set
                            .insert(outcome.index, status.channel_name.clone(), token.clone());
                    }
                    report.live.push(status);
                }
                Ok(_) => {}
                Err(error) => report.failures.push(LookupFailure {
                    channel_name: outcome.entry.name,
                    platform: outcome.entry.platform,
                    error,
                }),
            }
        }

        report
    }

    /// Live statuses for one platform.
    pub fn live_on(&self, platform: Platform) -> impl Iterator<Item = &LiveStatus> {
        self.live.iter().filter(move |s| s.platform == platform)
    }
}

/// Fold a finished set of outcomes into the live set.
pub fn aggregate<I>(outcomes: I) -> LiveSet
where
    I: IntoIterator<Item = LookupOutcome>,
{
    RoundReport::from_outcomes(outcomes).live_set
}

/// Drain the result channel until every sender is gone.
///
/// `recv()` returning `None` is the only completion signal; an empty but
/// open channel just means lookups are still in flight.
pub async fn drain(mut rx: mpsc::Receiver<LookupOutcome>) -> RoundReport {
    let mut outcomes = Vec::new();
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }
    RoundReport::from_outcomes(outcomes)
}
