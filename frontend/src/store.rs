//! Persistent client state: the current settings and the podcast history.
//!
//! Each slot is a JSON file named after it inside the data directory. A slot
//! that is missing or cannot be parsed loads as its default value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{GeneratedPodcast, PodcastSettings};
use thiserror::Error;
use tracing::{debug, warn};

pub const SETTINGS_SLOT: &str = "podcast_settings";
pub const HISTORY_SLOT: &str = "podcast_history";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not serialize {slot}: {source}")]
    Encode {
        slot: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    settings: PodcastSettings,
    history: Vec<GeneratedPodcast>,
}

impl LocalStore {
    /// Opens the store in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let settings = read_slot(&slot_path(&dir, SETTINGS_SLOT));
        let history: Vec<GeneratedPodcast> = read_slot(&slot_path(&dir, HISTORY_SLOT));
        debug!(dir = %dir.display(), entries = history.len(), "opened local store");
        Ok(Self {
            dir,
            settings,
            history,
        })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("podcaster")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings(&self) -> &PodcastSettings {
        &self.settings
    }

    /// Newest first.
    pub fn history(&self) -> &[GeneratedPodcast] {
        &self.history
    }

    /// Applies `change` and persists the result. On failure nothing changes.
    pub fn update_settings(
        &mut self,
        change: impl FnOnce(&mut PodcastSettings),
    ) -> Result<(), StoreError> {
        let mut next = self.settings.clone();
        change(&mut next);
        write_slot(&slot_path(&self.dir, SETTINGS_SLOT), SETTINGS_SLOT, &next)?;
        self.settings = next;
        Ok(())
    }

    /// Puts `podcast` at the front of the history and persists it. On failure
    /// nothing changes.
    pub fn prepend(&mut self, podcast: GeneratedPodcast) -> Result<(), StoreError> {
        let mut next = Vec::with_capacity(self.history.len() + 1);
        next.push(podcast);
        next.extend(self.history.iter().cloned());
        write_slot(&slot_path(&self.dir, HISTORY_SLOT), HISTORY_SLOT, &next)?;
        self.history = next;
        Ok(())
    }
}

fn slot_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{slot}.json"))
}

fn read_slot<T: DeserializeOwned + Default>(path: &Path) -> T {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(path = %path.display(), "unreadable slot, using defaults: {e}");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), "corrupt slot, using defaults: {e}");
        T::default()
    })
}

fn write_slot<T: Serialize>(path: &Path, slot: &'static str, value: &T) -> Result<(), StoreError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode { slot, source })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
