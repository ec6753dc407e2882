//! Configuration loaded from `~/.config/livecheck/config.toml` and
//! credentials loaded from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::live::providers::{twitch::TWITCH_API_BASE, youtube::YOUTUBE_API_BASE};
use crate::player::DEFAULT_PLAYER;
use crate::store::DEFAULT_CHANNELS_FILE;

/// Settings file contents. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Player executable.
    pub player: String,
    /// Extra player arguments placed before the URL.
    pub player_args: Vec<String>,
    /// Channel list location.
    pub channels_file: PathBuf,
    /// Per-lookup timeout in seconds. Unset means wait indefinitely.
    pub lookup_timeout_secs: Option<u64>,
    /// Maximum lookups in flight. Unset means one task per channel at once.
    pub max_concurrency: Option<usize>,
    pub youtube_api_base: String,
    pub twitch_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: DEFAULT_PLAYER.to_string(),
            player_args: Vec::new(),
            channels_file: PathBuf::from(DEFAULT_CHANNELS_FILE),
            lookup_timeout_secs: None,
            max_concurrency: None,
            youtube_api_base: YOUTUBE_API_BASE.to_string(),
            twitch_api_base: TWITCH_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file yields defaults; an explicitly given path must
    /// exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };

        if !required && !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ParseFailure::Toml(source) => ConfigError::Parse { path, source },
            ParseFailure::Invalid(e) => e,
        })?;
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self, ParseFailure> {
        let config: Self = toml::from_str(content).map_err(ParseFailure::Toml)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.player.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "player",
                reason: "must not be empty".into(),
            });
        }
        for (key, base) in [
            ("youtube_api_base", &self.youtube_api_base),
            ("twitch_api_base", &self.twitch_api_base),
        ] {
            Url::parse(base).map_err(|e| ConfigError::Invalid {
                key,
                reason: format!("{base:?}: {e}"),
            })?;
        }
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::Invalid {
                key: "max_concurrency",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug)]
enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("livecheck")
        .join("config.toml")
}

/// API credentials for both platforms.
#[derive(Clone)]
pub struct Credentials {
    pub youtube_api_key: String,
    pub twitch_client_id: String,
    pub twitch_oauth_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("youtube_api_key", &"[redacted]")
            .field("twitch_client_id", &self.twitch_client_id)
            .field("twitch_oauth_token", &"[redacted]")
            .finish()
    }
}

const YOUTUBE_KEY_VARS: [&str; 2] = ["ytApiKey", "YT_API_KEY"];
const TWITCH_CLIENT_ID_VARS: [&str; 2] = ["client_id", "TWITCH_CLIENT_ID"];
const TWITCH_TOKEN_VARS: [&str; 2] = ["oauth_token", "TWITCH_OAUTH_TOKEN"];

impl Credentials {
    /// Load `.env` from the working directory (if present), then read the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => {
                return Err(ConfigError::Invalid {
                    key: ".env",
                    reason: e.to_string(),
                })
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build credentials from any key lookup. The first non-empty name in
    /// each alias list wins.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |names: [&'static str; 2]| {
            names
                .iter()
                .find_map(|name| lookup(*name).filter(|v| !v.trim().is_empty()))
                .map(|v| v.trim().to_string())
                .ok_or(ConfigError::MissingCredential(names[0]))
        };

        Ok(Self {
            youtube_api_key: get(YOUTUBE_KEY_VARS)?,
            twitch_client_id: get(TWITCH_CLIENT_ID_VARS)?,
            twitch_oauth_token: get(TWITCH_TOKEN_VARS)?,
        })
    }
}
