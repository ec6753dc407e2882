use anyhow::Result;
use chrono::Utc;

use livecheck::live::{resolve, RoundReport};
use livecheck::{Platform, SelectionError, SelectionMode};

use super::output::format_report;
use super::{prompt, App, Scope};

pub async fn cmd_check(app: &App, scope: Scope, ask: bool) -> Result<()> {
    let entries = match scope.platform() {
        Some(platform) => app.store.load_platform(platform)?,
        None => app.store.load_all()?,
    };

    if entries.is_empty() {
        println!(
            "📭 No channels to check in {}. Add one with `livecheck add`.",
            app.store.path().display()
        );
        return Ok(());
    }

    println!("🔍 Checking {} channels...", entries.len());
    let report = app.coordinator.resolve_all(&entries).await;
    print!("{}", format_report(&report, Utc::now()));

    if ask && has_choices(&report, scope.selection_mode()) {
        choose_and_watch(app, &report, scope.selection_mode())?;
    }

    Ok(())
}

fn has_choices(report: &RoundReport, mode: SelectionMode) -> bool {
    match mode {
        SelectionMode::YouTube => !report.live_set.is_empty(),
        SelectionMode::Twitch => report.live_on(Platform::Twitch).next().is_some(),
        SelectionMode::Either => !report.live.is_empty(),
    }
}

/// Ask for a name until it resolves or the user gives up with an empty line.
pub fn choose_and_watch(app: &App, report: &RoundReport, mode: SelectionMode) -> Result<()> {
    loop {
        let Some(name) = prompt("Who would you like to watch (empty to skip): ")? else {
            return Ok(());
        };
        if name.is_empty() {
            return Ok(());
        }

        match resolve(&report.live_set, &name, mode) {
            Ok(url) => {
                if !url.verified {
                    println!("⚠️  {name} was not confirmed live, opening the channel page anyway");
                }
                app.player.launch(&url)?;
                println!("🎬 Opening {url} in {}...", app.player.program());
                return Ok(());
            }
            Err(SelectionError::NotFound(name)) => {
                println!("❌ {name} is not live right now. Try another name.");
                if !report.live_set.is_empty() {
                    println!("   Live now: {}", report.live_set.names().join(", "));
                }
            }
            Err(SelectionError::EmptyName) => return Ok(()),
        }
    }
}
