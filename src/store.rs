//! CSV channel list.
//!
//! One channel per line: `name,platform,provider_id`. Older two-column
//! files (`name,channel_id`) are read as YouTube channels and one-column
//! rows as Twitch logins.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::channel::{ChannelEntry, Platform};
use crate::error::StoreError;

pub const DEFAULT_CHANNELS_FILE: &str = "channels.csv";

/// File-backed list of followed channels.
#[derive(Debug, Clone)]
pub struct ChannelStore {
    path: PathBuf,
}

impl ChannelStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A missing file is an empty list.
    pub fn load_all(&self) -> Result<Vec<ChannelEntry>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No channel list at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Unavailable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut entries = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = parse_row(line).map_err(|reason| StoreError::CorruptRow {
                path: self.path.clone(),
                line: i + 1,
                reason,
            })?;
            entries.push(entry);
        }

        debug!("Loaded {} channels from {}", entries.len(), self.path.display());
        Ok(entries)
    }

    /// Entries for one platform only.
    pub fn load_platform(&self, platform: Platform) -> Result<Vec<ChannelEntry>, StoreError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|e| e.platform == platform)
            .collect())
    }

    /// Look up an entry by exact name.
    pub fn find(&self, name: &str) -> Result<Option<ChannelEntry>, StoreError> {
        let name = name.trim();
        Ok(self.load_all()?.into_iter().find(|e| e.name == name))
    }

    /// Append one entry, creating the file if needed.
    pub fn append(&self, entry: &ChannelEntry) -> Result<(), StoreError> {
        let row = format_row(entry)?;
        if self.find(&entry.name)?.is_some() {
            return Err(StoreError::Duplicate(entry.name.clone()));
        }

        let unavailable = |source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }

        // Keep the new row on its own line if the file lacks a trailing newline.
        let needs_newline = fs::read(&self.path)
            .map(|bytes| bytes.last().is_some_and(|b| *b != b'\n'))
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(unavailable)?;

        if needs_newline {
            file.write_all(b"\n").map_err(unavailable)?;
        }
        writeln!(file, "{row}").map_err(unavailable)?;

        info!("Added {} ({}) to {}", entry.name, entry.platform, self.path.display());
        Ok(())
    }
}

fn parse_row(line: &str) -> Result<ChannelEntry, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    let name = fields[0];
    if name.is_empty() {
        return Err("empty channel name".into());
    }

    match fields.as_slice() {
        [_] => Ok(ChannelEntry::twitch(name)),
        [_, id] => {
            if id.is_empty() {
                Err("missing YouTube channel ID".into())
            } else {
                Ok(ChannelEntry::youtube(name, *id))
            }
        }
        [_, tag, id] => {
            let platform: Platform = tag.parse()?;
            let provider_id = Some((*id).to_string()).filter(|id| !id.is_empty());
            if platform == Platform::YouTube && provider_id.is_none() {
                return Err("missing YouTube channel ID".into());
            }
            Ok(ChannelEntry {
                name: name.to_string(),
                platform,
                provider_id,
            })
        }
        _ => Err(format!("expected at most 3 fields, found {}", fields.len())),
    }
}

fn format_row(entry: &ChannelEntry) -> Result<String, StoreError> {
    let id = entry.provider_id().unwrap_or("");
    for field in [entry.name.as_str(), id] {
        if field.contains([',', '"', '\n', '\r']) {
            return Err(StoreError::InvalidField(field.to_string()));
        }
    }
    if entry.name.trim().is_empty() {
        return Err(StoreError::InvalidField(entry.name.clone()));
    }
    Ok(format!("{},{},{id}", entry.name.trim(), entry.platform.tag()))
}
