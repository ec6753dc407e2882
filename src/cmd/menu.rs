use anyhow::Result;

use livecheck::{Platform, StoreError};

use super::{add, check, prompt, watch, App, Scope};

const MENU: &str = "\
1. Check YouTube and Twitch
2. Check YouTube
3. Check Twitch
4. Add channel
5. Watch stream
6. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Check(Scope),
    Add,
    Watch,
    Exit,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim() {
        "1" => Some(Choice::Check(Scope::Both)),
        "2" => Some(Choice::Check(Scope::Youtube)),
        "3" => Some(Choice::Check(Scope::Twitch)),
        "4" => Some(Choice::Add),
        "5" => Some(Choice::Watch),
        "6" | "q" | "exit" => Some(Choice::Exit),
        _ => None,
    }
}

/// Numbered menu loop. Runs until "Exit" or end of input.
pub async fn cmd_menu(app: &App) -> Result<()> {
    loop {
        println!("\n{MENU}");
        let Some(input) = prompt("> ")? else {
            return Ok(());
        };

        let result = match parse_choice(&input) {
            Some(Choice::Check(scope)) => check::cmd_check(app, scope, true).await,
            Some(Choice::Add) => menu_add(app).await,
            Some(Choice::Watch) => menu_watch(app).await,
            Some(Choice::Exit) => return Ok(()),
            None => {
                println!("Pick a number from 1 to 6.");
                continue;
            }
        };

        if let Err(e) = result {
            // A broken channel list stops the session; anything else is
            // reported and the menu comes back.
            if e.downcast_ref::<StoreError>().is_some_and(is_fatal) {
                return Err(e);
            }
            println!("❌ {e:#}");
        }
    }
}

fn is_fatal(e: &StoreError) -> bool {
    matches!(e, StoreError::Unavailable { .. } | StoreError::CorruptRow { .. })
}

async fn menu_add(app: &App) -> Result<()> {
    let Some(name) = prompt("Channel name: ")? else {
        return Ok(());
    };
    let Some(platform) = prompt("Platform (youtube/twitch): ")? else {
        return Ok(());
    };
    let platform: Platform = platform.parse().map_err(anyhow::Error::msg)?;

    let id = if platform == Platform::YouTube {
        prompt("YouTube channel ID (empty to search by name): ")?
    } else {
        None
    };

    add::cmd_add(app, &name, platform, id.as_deref()).await
}

async fn menu_watch(app: &App) -> Result<()> {
    let names: Vec<String> = app.store.load_all()?.into_iter().map(|e| e.name).collect();
    if names.is_empty() {
        println!("📭 Your channel list is empty.");
        return Ok(());
    }
    for name in &names {
        println!("   {name}");
    }

    match prompt("Who would you like to watch: ")? {
        Some(name) if !name.is_empty() => watch::cmd_watch(app, &name).await,
        _ => Ok(()),
    }
}
