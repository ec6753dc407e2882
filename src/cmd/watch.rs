use anyhow::Result;

use livecheck::live::{resolve, select::twitch_fallback};
use livecheck::{Platform, SelectionError, SelectionMode};

use super::App;

pub async fn cmd_watch(app: &App, name: &str) -> Result<()> {
    let name = name.trim();
    let Some(entry) = app.store.find(name)? else {
        println!("❌ {}", SelectionError::NotFound(name.to_string()));
        println!("   {name} is not in {}", app.store.path().display());
        return Ok(());
    };

    let url = match entry.platform {
        // Twitch channel pages are playable by login, no lookup needed.
        Platform::Twitch => twitch_fallback(&entry.name),
        Platform::YouTube => {
            println!("📡 Checking whether {name} is live...");
            let report = app.coordinator.resolve_all(std::slice::from_ref(&entry)).await;
            if let Some(failure) = report.failures.first() {
                println!("⚠️  Lookup failed: {}", failure.error);
                return Ok(());
            }
            match resolve(&report.live_set, &entry.name, SelectionMode::YouTube) {
                Ok(url) => url,
                Err(_) => {
                    println!("😴 {name} is not live right now.");
                    return Ok(());
                }
            }
        }
    };

    app.player.launch(&url)?;
    println!("🎬 Opening {url} in {}...", app.player.program());
    Ok(())
}
