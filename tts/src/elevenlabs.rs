use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::traits::{AudioStream, SpeechRequest, Synthesizer};
use crate::{Result, TTSError};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Client for the ElevenLabs streaming text-to-speech endpoint.
#[derive(Clone)]
pub struct ElevenLabsTts {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsTts {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The voice id is a single encoded path segment; dot segments are
    /// refused since URL normalization would resolve them.
    fn stream_url(&self, voice_id: &str) -> Result<String> {
        if voice_id.is_empty() || voice_id == "." || voice_id == ".." {
            return Err(TTSError::InvalidVoice(voice_id.to_string()));
        }
        Ok(format!(
            "{}/v1/text-to-speech/{}/stream",
            self.base_url,
            urlencoding::encode(voice_id)
        ))
    }
}

#[derive(Serialize)]
struct TtsBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl Synthesizer for ElevenLabsTts {
    async fn stream_speech(&self, request: &SpeechRequest<'_>) -> Result<AudioStream> {
        let url = self.stream_url(request.voice_id)?;
        info!(voice = request.voice_id, chars = request.text.chars().count(), "requesting TTS");
        let res = self
            .client
            .post(url)
            .query(&[("output_format", request.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .json(&TtsBody {
                text: request.text,
                model_id: request.model_id,
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            warn!(%status, "TTS request rejected");
            return Err(TTSError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let stream = res
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(|e| TTSError::Stream(e.to_string())));
        Ok(Box::pin(stream))
    }
}
