//! One podcast generation, from prompt to history entry.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use shared::{DataUriError, GeneratedPodcast, PodcastSettings, VoiceOption, data_uri};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::api::{ApiError, PodcastApi};
use crate::notify::{NoticeLevel, Notifier};
use crate::store::{LocalStore, StoreError};

pub const SUCCESS_MESSAGE: &str = "Podcast generated successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to generate podcast. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    GeneratingScript,
    GeneratingAudio,
    Completed,
    Failed,
}

impl FlowState {
    pub fn is_busy(self) -> bool {
        matches!(self, FlowState::GeneratingScript | FlowState::GeneratingAudio)
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Please enter a prompt")]
    MissingPrompt,
    #[error("Please select a voice")]
    MissingVoice,
    #[error("a podcast is already being generated")]
    Busy,
    #[error("generation cancelled")]
    Cancelled,
    #[error("script generation failed: {0}")]
    Script(#[source] ApiError),
    #[error("audio generation failed: {0}")]
    Audio(#[source] ApiError),
    #[error("audio is not a playable data URI: {0}")]
    InvalidAudio(#[source] DataUriError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Drives generations for one client session.
///
/// At most one generation runs at a time. Progress is published through
/// [`PodcastFlow::subscribe`].
pub struct PodcastFlow<A> {
    api: A,
    store: Mutex<LocalStore>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<FlowState>,
    current: Mutex<Option<GeneratedPodcast>>,
}

impl<A: PodcastApi> PodcastFlow<A> {
    pub fn new(api: A, store: LocalStore, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            api,
            store: Mutex::new(store),
            notifier,
            state,
            current: Mutex::new(None),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> FlowState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> PodcastSettings {
        self.store.lock().settings().clone()
    }

    pub fn history(&self) -> Vec<GeneratedPodcast> {
        self.store.lock().history().to_vec()
    }

    /// The podcast produced by the last successful generation of this session.
    pub fn current(&self) -> Option<GeneratedPodcast> {
        self.current.lock().clone()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) -> Result<(), StoreError> {
        let prompt = prompt.into();
        self.store.lock().update_settings(|s| s.prompt = prompt)
    }

    pub fn select_voice(&self, voice: VoiceOption) -> Result<(), StoreError> {
        self.store
            .lock()
            .update_settings(|s| s.selected_voice = Some(voice))
    }

    pub async fn preview(&self, voice_id: &str) -> Result<String, ApiError> {
        self.api.preview_voice(voice_id).await
    }

    /// Generates a podcast from the saved settings.
    ///
    /// Precondition failures and [`FlowError::Busy`] leave the state as it
    /// was. Any other failure ends in [`FlowState::Failed`] with history and
    /// the current podcast untouched, as does dropping the returned future
    /// before it completes.
    pub async fn generate(&self, cancel: &CancellationToken) -> Result<GeneratedPodcast, FlowError> {
        let settings = self.settings();
        if settings.prompt.trim().is_empty() {
            return Err(self.reject(FlowError::MissingPrompt));
        }
        let Some(voice) = settings.selected_voice else {
            return Err(self.reject(FlowError::MissingVoice));
        };
        if !self.begin() {
            warn!("generation already in flight");
            return Err(FlowError::Busy);
        }
        let in_flight = InFlight::new(&self.state);

        match self.run(&settings.prompt, settings.duration, voice, cancel).await {
            Ok(podcast) => {
                in_flight.settle(FlowState::Completed);
                info!(id = %podcast.id, "podcast generated");
                self.notifier.notify(NoticeLevel::Success, SUCCESS_MESSAGE);
                Ok(podcast)
            }
            Err(e) => {
                in_flight.settle(FlowState::Failed);
                error!("podcast generation failed: {e}");
                self.notifier.notify(NoticeLevel::Error, FAILURE_MESSAGE);
                Err(e)
            }
        }
    }

    fn reject(&self, err: FlowError) -> FlowError {
        self.notifier.notify(NoticeLevel::Error, &err.to_string());
        err
    }

    fn begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }
            *state = FlowState::GeneratingScript;
            true
        })
    }

    async fn run(
        &self,
        prompt: &str,
        duration: u32,
        voice: VoiceOption,
        cancel: &CancellationToken,
    ) -> Result<GeneratedPodcast, FlowError> {
        let script = until_cancelled(cancel, self.api.generate_script(prompt, duration))
            .await?
            .map_err(FlowError::Script)?
            .script;

        self.state.send_replace(FlowState::GeneratingAudio);
        let audio = until_cancelled(cancel, self.api.generate_audio(&script, &voice))
            .await?
            .map_err(FlowError::Audio)?;
        data_uri::decode(&audio.audio_url).map_err(FlowError::InvalidAudio)?;

        self.commit(|id| GeneratedPodcast {
            id,
            prompt: prompt.to_string(),
            script,
            audio_url: audio.audio_url,
            created_at: Utc::now(),
            duration: audio.duration,
            voice,
        })
    }

    fn commit(
        &self,
        build: impl FnOnce(String) -> GeneratedPodcast,
    ) -> Result<GeneratedPodcast, FlowError> {
        let mut store = self.store.lock();
        let podcast = build(next_id(store.history()));
        store.prepend(podcast.clone())?;
        *self.current.lock() = Some(podcast.clone());
        Ok(podcast)
    }
}

/// Marks a generation failed if its future is dropped before it settles.
struct InFlight<'a> {
    state: &'a watch::Sender<FlowState>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a watch::Sender<FlowState>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, outcome: FlowState) {
        self.state.send_replace(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("generation abandoned before it finished");
            self.state.send_replace(FlowState::Failed);
        }
    }
}

async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, FlowError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FlowError::Cancelled),
        out = fut => Ok(out),
    }
}

/// Millisecond timestamp, kept ahead of the newest entry in `history`.
fn next_id(history: &[GeneratedPodcast]) -> String {
    let now = Utc::now().timestamp_millis();
    let newest = history.first().and_then(|p| p.id.parse::<i64>().ok());
    match newest {
        Some(last) if now <= last => (last + 1).to_string(),
        _ => now.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::VOICES;

    fn entry(id: &str) -> GeneratedPodcast {
        GeneratedPodcast {
            id: id.into(),
            prompt: "p".into(),
            script: "s".into(),
            audio_url: "data:audio/mp3;base64,".into(),
            created_at: Utc::now(),
            duration: 1,
            voice: VOICES[0].to_option(),
        }
    }

    #[test]
    fn id_is_a_timestamp_on_empty_history() {
        let id: i64 = next_id(&[]).parse().unwrap();
        assert!(id > 1_600_000_000_000);
    }

    #[test]
    fn id_stays_ahead_of_newest_entry() {
        let future = (Utc::now().timestamp_millis() + 60_000).to_string();
        let id: i64 = next_id(&[entry(&future)]).parse().unwrap();
        assert_eq!(id, future.parse::<i64>().unwrap() + 1);
    }

    #[test]
    fn busy_states() {
        assert!(FlowState::GeneratingScript.is_busy());
        assert!(FlowState::GeneratingAudio.is_busy());
        assert!(!FlowState::Idle.is_busy());
        assert!(!FlowState::Completed.is_busy());
        assert!(!FlowState::Failed.is_busy());
    }
}
