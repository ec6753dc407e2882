use std::fmt::Write;

use chrono::{DateTime, Utc};

use livecheck::live::RoundReport;
use livecheck::{LiveStatus, Platform};

/// Render a round report for the terminal.
pub fn format_report(report: &RoundReport, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let youtube: Vec<&LiveStatus> = report.live_on(Platform::YouTube).collect();
    if !youtube.is_empty() {
        out.push_str("📺 Live on YouTube:\n");
        for status in youtube {
            let _ = writeln!(out, "   🔴 {}{}", status.channel_name, details(status, now));
        }
    }

    for status in report.live_on(Platform::Twitch) {
        let _ = writeln!(
            out,
            "🟣 {} is live! Title: {}{}",
            status.channel_name,
            status.title.as_deref().unwrap_or("(untitled)"),
            status
                .started_at
                .map(|t| format!(" (up {})", format_uptime(now - t)))
                .unwrap_or_default()
        );
    }

    if report.live.is_empty() {
        out.push_str("😴 Nobody is live right now.\n");
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "⚠️  {} lookup(s) failed:", report.failures.len());
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "   {} ({}): {}",
                failure.channel_name, failure.platform, failure.error
            );
        }
    }

    out
}

fn details(status: &LiveStatus, now: DateTime<Utc>) -> String {
    let mut s = String::new();
    if let Some(title) = &status.title {
        let _ = write!(s, ": {title}");
    }
    if let Some(started) = status.started_at {
        let _ = write!(s, " (up {})", format_uptime(now - started));
    }
    s
}

fn format_uptime(elapsed: chrono::Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h{:02}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use livecheck::error::LookupError;
    use livecheck::live::LookupOutcome;
    use livecheck::ChannelEntry;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap()
    }

    fn live(index: usize, entry: ChannelEntry, token: Option<&str>, title: &str) -> LookupOutcome {
        LookupOutcome {
            index,
            result: Ok(LiveStatus {
                channel_name: entry.name.clone(),
                platform: entry.platform,
                is_live: true,
                title: Some(title.to_string()),
                watch_token: token.map(String::from),
                started_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 45, 0).unwrap()),
            }),
            entry,
        }
    }

    #[test]
    fn reports_both_platforms() {
        let report = RoundReport::from_outcomes(vec![
            live(0, ChannelEntry::youtube("alice", "chan123"), Some("xyz"), "Alice live"),
            live(1, ChannelEntry::twitch("bob"), None, "Stream"),
        ]);
        let text = format_report(&report, now());
        assert!(text.contains("🔴 alice: Alice live (up 1h15m)"));
        assert!(text.contains("bob is live! Title: Stream (up 1h15m)"));
        assert!(!text.contains("Nobody"));
    }

    #[test]
    fn reports_nobody_live_and_failures() {
        let entry = ChannelEntry::youtube("dave", "chan789");
        let report = RoundReport::from_outcomes(vec![LookupOutcome {
            index: 0,
            entry,
            result: Err(LookupError::Unauthorized("403 Forbidden".into())),
        }]);
        let text = format_report(&report, now());
        assert!(text.contains("Nobody is live"));
        assert!(text.contains("1 lookup(s) failed"));
        assert!(text.contains("dave (YouTube): unauthorized: 403 Forbidden"));
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_uptime(chrono::Duration::minutes(125)), "2h05m");
        assert_eq!(format_uptime(chrono::Duration::minutes(-3)), "0m");
    }
}
