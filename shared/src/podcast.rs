use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MAX_DURATION_MINUTES, VoiceOption};

/// User-editable generation settings, persisted by the client on every change.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, export_to = "../frontend/bindings/PodcastSettings.ts"))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodcastSettings {
    pub duration: u32,
    pub selected_voice: Option<VoiceOption>,
    pub prompt: String,
}

impl Default for PodcastSettings {
    fn default() -> Self {
        Self {
            duration: MAX_DURATION_MINUTES,
            selected_voice: None,
            prompt: String::new(),
        }
    }
}

/// A finished podcast. Only a fully successful generation produces one.
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, export_to = "../frontend/bindings/GeneratedPodcast.ts"))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPodcast {
    pub id: String,
    pub prompt: String,
    pub script: String,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
    pub duration: u32,
    pub voice: VoiceOption,
}
