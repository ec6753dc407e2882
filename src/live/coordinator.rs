//! Fan-out of per-channel lookups.
//!
//! Every entry gets its own task. Tasks report through a bounded channel
//! sized to the batch, and a watcher task holds the last sender until all
//! of them have been joined, so the drain loop ends exactly when the round
//! is complete.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use crate::channel::ChannelEntry;
use crate::error::LookupError;
use crate::live::aggregate::{drain, LookupOutcome, RoundReport};
use crate::live::provider::{LiveProvider, LiveStatus};
use crate::live::providers::Providers;

/// Runs one polling round over a channel list.
#[derive(Clone)]
pub struct Coordinator {
    providers: Providers,
    max_concurrency: Option<usize>,
    lookup_timeout: Option<Duration>,
}

impl Coordinator {
    /// Unbounded fan-out, no per-lookup timeout.
    pub fn new(providers: Providers) -> Self {
        Self {
            providers,
            max_concurrency: None,
            lookup_timeout: None,
        }
    }

    /// Cap the number of lookups in flight at once.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    /// Give up on a lookup after `timeout` and count it as a network failure.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Look up every entry concurrently and aggregate the results.
    ///
    /// Returns only after every lookup has reported, whatever the mix of
    /// live, offline and failed outcomes. Individual failures are logged and
    /// counted as not live; they never abort the round.
    pub async fn resolve_all(&self, entries: &[ChannelEntry]) -> RoundReport {
        let start = Instant::now();
        let (tx, rx) = mpsc::channel(entries.len().max(1));
        let semaphore = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        let mut handles = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().cloned().enumerate() {
            let provider = self.providers.for_platform(entry.platform);
            let semaphore = semaphore.clone();
            let timeout = self.lookup_timeout;
            let tx = tx.clone();
            let tag = (index, entry.clone());

            let handle = tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };

                let result = run_lookup(provider.as_ref(), &entry, timeout).await;
                match &result {
                    Ok(status) => debug!(
                        "{} ({}): live={}",
                        entry.name, entry.platform, status.is_live
                    ),
                    Err(e) => warn!("Lookup for {} ({}) failed: {e}", entry.name, entry.platform),
                }

                // The receiver outlives every sender, so this cannot fail.
                let _ = tx.send(LookupOutcome { index, entry, result }).await;
            });
            handles.push((tag, handle));
        }

        // Completion watcher: owns the original sender and drops it only
        // after every task has been joined.
        tokio::spawn(async move {
            let (tags, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
            for ((index, entry), joined) in tags.into_iter().zip(join_all(handles).await) {
                if let Err(e) = joined {
                    warn!("Lookup task for {} died: {e}", entry.name);
                    let _ = tx
                        .send(LookupOutcome {
                            index,
                            entry,
                            result: Err(LookupError::Aborted(e.to_string())),
                        })
                        .await;
                }
            }
            drop(tx);
        });

        let report = drain(rx).await;
        info!(
            "Checked {} channels in {:?}: {} live, {} failed",
            report.attempted,
            start.elapsed(),
            report.live.len(),
            report.failures.len()
        );
        report
    }
}

async fn run_lookup(
    provider: &dyn LiveProvider,
    entry: &ChannelEntry,
    timeout: Option<Duration>,
) -> Result<LiveStatus, LookupError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, provider.lookup(entry))
            .await
            .unwrap_or_else(|_| {
                Err(LookupError::NetworkFailure(format!(
                    "no response from {} within {limit:?}",
                    provider.name()
                )))
            }),
        None => provider.lookup(entry).await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::channel::Platform;

    #[derive(Clone)]
    enum Canned {
        Live { token: Option<&'static str>, title: &'static str },
        Offline,
        Fail(LookupError),
        Panic,
    }

    /// Provider that answers from a fixed table and counts calls.
    struct FakeProvider {
        platform: Platform,
        answers: HashMap<String, Canned>,
        delays: HashMap<String, Duration>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl FakeProvider {
        fn new(platform: Platform) -> Self {
            Self {
                platform,
                answers: HashMap::new(),
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }

        fn answer(mut self, key: &str, canned: Canned) -> Self {
            self.answers.insert(key.to_string(), canned);
            self
        }

        fn delay(mut self, key: &str, delay: Duration) -> Self {
            self.delays.insert(key.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl LiveProvider for FakeProvider {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn lookup(&self, entry: &ChannelEntry) -> Result<LiveStatus, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            let key = entry.provider_id().unwrap_or(&entry.name).to_string();
            if let Some(delay) = self.delays.get(&key) {
                tokio::time::sleep(*delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.answers.get(&key).cloned().unwrap_or(Canned::Offline) {
                Canned::Live { token, title } => Ok(LiveStatus {
                    channel_name: entry.name.clone(),
                    platform: self.platform,
                    is_live: true,
                    title: Some(title.to_string()),
                    watch_token: token.map(String::from),
                    started_at: None,
                }),
                Canned::Offline => Ok(LiveStatus::offline(entry)),
                Canned::Fail(e) => Err(e),
                Canned::Panic => panic!("provider blew up on {key}"),
            }
        }
    }

    fn coordinator(youtube: &Arc<FakeProvider>, twitch: &Arc<FakeProvider>) -> Coordinator {
        Coordinator::new(Providers::new(youtube.clone(), twitch.clone()))
    }

    #[tokio::test]
    async fn resolves_mixed_platform_scenario() {
        let youtube = Arc::new(FakeProvider::new(Platform::YouTube).answer(
            "chan123",
            Canned::Live { token: Some("xyz"), title: "Alice live" },
        ));
        let twitch = Arc::new(
            FakeProvider::new(Platform::Twitch)
                .answer("bob", Canned::Live { token: None, title: "Stream" }),
        );

        let entries = vec![
            ChannelEntry::youtube("alice", "chan123"),
            ChannelEntry::twitch("bob"),
        ];
        let report = coordinator(&youtube, &twitch).resolve_all(&entries).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.live_set.len(), 1);
        assert_eq!(report.live_set.get("alice"), Some("xyz"));

        let twitch_live: Vec<_> = report.live_on(Platform::Twitch).collect();
        assert_eq!(twitch_live.len(), 1);
        assert_eq!(twitch_live[0].channel_name, "bob");
        assert_eq!(twitch_live[0].title.as_deref(), Some("Stream"));
    }

    #[tokio::test]
    async fn every_entry_is_looked_up_exactly_once() {
        let youtube = Arc::new(
            FakeProvider::new(Platform::YouTube)
                .answer("c1", Canned::Live { token: Some("v1"), title: "one" })
                .answer("c2", Canned::Fail(LookupError::Unauthorized("bad key".into())))
                .answer("c3", Canned::Fail(LookupError::MalformedResponse("junk".into())))
                .delay("c1", Duration::from_millis(30)),
        );
        let twitch = Arc::new(
            FakeProvider::new(Platform::Twitch)
                .answer("t1", Canned::Fail(LookupError::NetworkFailure("reset".into())))
                .answer("t2", Canned::Live { token: None, title: "two" })
                .delay("t2", Duration::from_millis(10)),
        );

        let entries = vec![
            ChannelEntry::youtube("y1", "c1"),
            ChannelEntry::youtube("y2", "c2"),
            ChannelEntry::youtube("y3", "c3"),
            ChannelEntry::youtube("y4", "c4"),
            ChannelEntry::twitch("t1"),
            ChannelEntry::twitch("t2"),
            ChannelEntry::twitch("t3"),
        ];
        let report = coordinator(&youtube, &twitch).resolve_all(&entries).await;

        assert_eq!(youtube.calls.load(Ordering::SeqCst), 4);
        assert_eq!(twitch.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.attempted, entries.len());
        assert_eq!(report.failures.len(), 3);
        assert_eq!(report.live.len(), 2);
        assert_eq!(report.live_set.get("y1"), Some("v1"));
    }

    #[tokio::test]
    async fn failures_do_not_poison_siblings() {
        let youtube = Arc::new(
            FakeProvider::new(Platform::YouTube)
                .answer("bad", Canned::Fail(LookupError::NetworkFailure("dns".into())))
                .answer("good", Canned::Live { token: Some("vid"), title: "ok" }),
        );
        let twitch = Arc::new(FakeProvider::new(Platform::Twitch));

        let entries = vec![
            ChannelEntry::youtube("broken", "bad"),
            ChannelEntry::youtube("fine", "good"),
        ];
        let report = coordinator(&youtube, &twitch).resolve_all(&entries).await;

        assert_eq!(report.live_set.get("fine"), Some("vid"));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].channel_name, "broken");
        assert_eq!(
            report.failures[0].error,
            LookupError::NetworkFailure("dns".into())
        );
    }

    #[tokio::test]
    async fn panicking_lookup_is_reported_not_lost() {
        let youtube = Arc::new(
            FakeProvider::new(Platform::YouTube)
                .answer("boom", Canned::Panic)
                .answer("ok", Canned::Live { token: Some("vid"), title: "fine" }),
        );
        let twitch = Arc::new(FakeProvider::new(Platform::Twitch));

        let entries = vec![
            ChannelEntry::youtube("bomb", "boom"),
            ChannelEntry::youtube("calm", "ok"),
        ];
        let report = coordinator(&youtube, &twitch).resolve_all(&entries).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.live_set.get("calm"), Some("vid"));
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, LookupError::Aborted(_)));
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_last_entry_every_run() {
        // The later entry answers first, so arrival order is the reverse of
        // input order.
        let youtube = Arc::new(
            FakeProvider::new(Platform::YouTube)
                .answer("first", Canned::Live { token: Some("from-first"), title: "a" })
                .answer("second", Canned::Live { token: Some("from-second"), title: "b" })
                .delay("first", Duration::from_millis(15)),
        );
        let twitch = Arc::new(FakeProvider::new(Platform::Twitch));
        let coordinator = coordinator(&youtube, &twitch);

        let entries = vec![
            ChannelEntry::youtube("alice", "first"),
            ChannelEntry::youtube("alice", "second"),
        ];
        for _ in 0..10 {
            let report = coordinator.resolve_all(&entries).await;
            assert_eq!(report.live_set.len(), 1);
            assert_eq!(report.live_set.get("alice"), Some("from-second"));
        }
    }

    #[tokio::test]
    async fn timeout_counts_as_network_failure() {
        let youtube = Arc::new(
            FakeProvider::new(Platform::YouTube)
                .answer("slow", Canned::Live { token: Some("late"), title: "zzz" })
                .delay("slow", Duration::from_secs(5)),
        );
        let twitch = Arc::new(FakeProvider::new(Platform::Twitch));

        let report = coordinator(&youtube, &twitch)
            .with_lookup_timeout(Some(Duration::from_millis(20)))
            .resolve_all(&[ChannelEntry::youtube("sleepy", "slow")])
            .await;

        assert!(report.live_set.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            LookupError::NetworkFailure(_)
        ));
    }

    #[tokio::test]
    async fn concurrency_cap_limits_in_flight_lookups() {
        let mut fake = FakeProvider::new(Platform::YouTube);
        let mut entries = Vec::new();
        for i in 0..6 {
            let id = format!("c{i}");
            fake = fake.delay(&id, Duration::from_millis(20));
            entries.push(ChannelEntry::youtube(format!("ch{i}"), id));
        }
        let youtube = Arc::new(fake);
        let twitch = Arc::new(FakeProvider::new(Platform::Twitch));

        let report = coordinator(&youtube, &twitch)
            .with_max_concurrency(Some(2))
            .resolve_all(&entries)
            .await;

        assert_eq!(report.attempted, 6);
        assert_eq!(youtube.calls.load(Ordering::SeqCst), 6);
        assert!(youtube.peak_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn empty_list_finishes_immediately() {
        let youtube = Arc::new(FakeProvider::new(Platform::YouTube));
        let twitch = Arc::new(FakeProvider::new(Platform::Twitch));
        let report = coordinator(&youtube, &twitch).resolve_all(&[]).await;
        assert_eq!(report.attempted, 0);
        assert!(report.live_set.is_empty());
    }
}
