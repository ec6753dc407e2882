//! External media player launcher
//!
//! Spawns the player (mpv by default) with the stream URL as its only
//! argument and returns without waiting for it.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::PlayerError;
use crate::live::PlayableUrl;

pub const DEFAULT_PLAYER: &str = "mpv";

/// A media player that accepts a URL on its command line.
#[derive(Debug, Clone)]
pub struct Player {
    /// Resolved path to the player binary.
    program: String,
    /// Arguments placed before the URL.
    extra_args: Vec<String>,
}

impl Player {
    /// Create a launcher for `program`, searching for it in PATH.
    ///
    /// Falls back to the bare name so a missing binary is reported at
    /// spawn time rather than at startup.
    pub fn new(program: &str) -> Self {
        let program = which::which(program)
            .map_or_else(|_| program.to_string(), |p| p.to_string_lossy().to_string());
        debug!("Player binary: {program}");

        Self {
            program,
            extra_args: Vec::new(),
        }
    }

    /// Add arguments passed before the URL (e.g. `--fs`).
    #[must_use]
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check whether the player binary can be found.
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn build_args(&self, url: &PlayableUrl) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.push(url.url.clone());
        args
    }

    /// Start the player and return immediately.
    ///
    /// The child is detached from our stdio and its exit status is never
    /// collected.
    pub fn launch(&self, url: &PlayableUrl) -> Result<(), PlayerError> {
        let args = self.build_args(url);
        info!("Launching {} {}", self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        debug!("Player started (pid {:?})", child.id());
        Ok(())
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}
