//! Speech synthesis and voice previews.

use std::sync::Arc;

use futures::StreamExt;
use shared::{data_uri, MAX_DURATION_MINUTES};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::traits::{AudioStream, SpeechRequest, Synthesizer};
use crate::TTSError;

/// Sentence spoken when auditioning a voice.
pub const PREVIEW_TEXT: &str = "Hi, this is a sample of my voice.";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Missing required parameters")]
    MissingInput,
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] TTSError),
}

/// Playable audio for a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// `data:audio/mp3;base64,` URI of the full recording.
    pub audio_url: String,
    /// Nominal length in minutes. Not measured from the audio.
    pub duration: u32,
}

pub struct SpeechService {
    synthesizer: Arc<dyn Synthesizer>,
}

impl SpeechService {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self { synthesizer }
    }

    /// Synthesize `script` with `voice_id`.
    pub async fn synthesize(
        &self,
        script: &str,
        voice_id: &str,
    ) -> Result<SynthesizedAudio, SpeechError> {
        if script.trim().is_empty() || voice_id.trim().is_empty() {
            return Err(SpeechError::MissingInput);
        }
        let audio = self.render(voice_id, script).await?;
        Ok(SynthesizedAudio {
            audio_url: data_uri::encode_mp3(&audio),
            duration: MAX_DURATION_MINUTES,
        })
    }

    /// Render [`PREVIEW_TEXT`] with `voice_id`.
    pub async fn preview(&self, voice_id: &str) -> Result<String, SpeechError> {
        if voice_id.trim().is_empty() {
            return Err(SpeechError::MissingInput);
        }
        let audio = self.render(voice_id, PREVIEW_TEXT).await?;
        Ok(data_uri::encode_mp3(&audio))
    }

    async fn render(&self, voice_id: &str, text: &str) -> Result<Vec<u8>, TTSError> {
        let request = SpeechRequest::new(voice_id, text);
        let stream = self.synthesizer.stream_speech(&request).await.map_err(|e| {
            error!(error = %e, voice = voice_id, "tts request failed");
            e
        })?;
        let audio = drain(stream).await.map_err(|e| {
            error!(error = %e, voice = voice_id, "tts streaming failed");
            e
        })?;
        info!(voice = voice_id, bytes = audio.len(), "speech synthesized");
        Ok(audio)
    }
}

/// Consume every chunk of `stream`, concatenating them in arrival order.
///
/// Fails on the first chunk error or when the stream carried no bytes.
pub async fn drain(mut stream: AudioStream) -> Result<Vec<u8>, TTSError> {
    let mut buf = Vec::new();
    let mut chunks = 0usize;
    while let Some(chunk) = stream.next().await {
        buf.extend(chunk?);
        chunks += 1;
    }
    debug!(chunks, bytes = buf.len(), "audio stream drained");
    if buf.is_empty() {
        return Err(TTSError::EmptyAudio);
    }
    Ok(buf)
}
