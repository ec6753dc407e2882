use anyhow::{bail, Context, Result};

use livecheck::{ChannelEntry, Platform};

use super::App;

pub async fn cmd_add(app: &App, name: &str, platform: Platform, id: Option<&str>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Channel name must not be empty");
    }

    let entry = match platform {
        Platform::Twitch => ChannelEntry::twitch(name),
        Platform::YouTube => {
            let channel_id = match id.map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => id.to_string(),
                None => {
                    println!("🔎 Looking up YouTube channel ID for {name}...");
                    app.youtube
                        .resolve_channel_id(name)
                        .await
                        .context("YouTube channel search failed")?
                        .with_context(|| format!("No YouTube channel found for '{name}'"))?
                }
            };
            ChannelEntry::youtube(name, channel_id)
        }
    };

    app.store.append(&entry)?;
    match entry.provider_id() {
        Some(id) => println!("✅ Added {name} ({platform}, {id})"),
        None => println!("✅ Added {name} ({platform})"),
    }
    Ok(())
}
