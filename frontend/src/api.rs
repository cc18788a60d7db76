//! Calls to the podcast backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    ErrorResponse, GenerateAudioRequest, GenerateAudioResponse, GenerateScriptRequest,
    GenerateScriptResponse, PreviewVoiceResponse, VoiceOption,
};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl ApiError {
    /// Whether the failure came from infrastructure rather than the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Rejected { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

#[async_trait]
pub trait PodcastApi: Send + Sync {
    async fn generate_script(
        &self,
        prompt: &str,
        duration: u32,
    ) -> Result<GenerateScriptResponse, ApiError>;

    async fn generate_audio(
        &self,
        script: &str,
        voice: &VoiceOption,
    ) -> Result<GenerateAudioResponse, ApiError>;

    /// Returns the `data:` URI of a short sample spoken by `voice_id`.
    async fn preview_voice(&self, voice_id: &str) -> Result<String, ApiError>;
}

/// [`PodcastApi`] over HTTP.
#[derive(Clone)]
pub struct HttpPodcastApi {
    client: Client,
    base_url: String,
}

impl HttpPodcastApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<T>().await?);
    }
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    debug!(%status, %message, "backend rejected request");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PodcastApi for HttpPodcastApi {
    async fn generate_script(
        &self,
        prompt: &str,
        duration: u32,
    ) -> Result<GenerateScriptResponse, ApiError> {
        let body = GenerateScriptRequest {
            prompt: prompt.to_string(),
            duration: Some(duration),
        };
        let res = self
            .client
            .post(self.url("/api/generate-script"))
            .json(&body)
            .send()
            .await?;
        decode(res).await
    }

    async fn generate_audio(
        &self,
        script: &str,
        voice: &VoiceOption,
    ) -> Result<GenerateAudioResponse, ApiError> {
        let body = GenerateAudioRequest {
            script: script.to_string(),
            voice_id: voice.id.clone(),
        };
        let res = self
            .client
            .post(self.url("/api/generate-audio"))
            .json(&body)
            .send()
            .await?;
        decode(res).await
    }

    async fn preview_voice(&self, voice_id: &str) -> Result<String, ApiError> {
        let path = format!("/api/preview-voice/{}", urlencoding::encode(voice_id));
        let res = self.client.get(self.url(&path)).send().await?;
        let preview: PreviewVoiceResponse = decode(res).await?;
        Ok(preview.preview_url)
    }
}
