use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;

use crate::Result;

/// Synthesis model requested from the provider.
pub const SYNTHESIS_MODEL: &str = "eleven_multilingual_v2";

/// Stream of encoded audio chunks, in arrival order.
///
/// The stream is finite and cannot be restarted.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Audio container and bitrate of synthesized speech.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    /// MP3, 44.1 kHz, 128 kbps.
    #[serde(rename = "mp3_44100_128")]
    Mp3_44100_128,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Mp3_44100_128 => "mp3_44100_128",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechRequest<'a> {
    pub voice_id: &'a str,
    pub text: &'a str,
    pub model_id: &'a str,
    pub output_format: OutputFormat,
}

impl<'a> SpeechRequest<'a> {
    /// Request using the fixed model and output format.
    pub fn new(voice_id: &'a str, text: &'a str) -> Self {
        Self {
            voice_id,
            text,
            model_id: SYNTHESIS_MODEL,
            output_format: OutputFormat::Mp3_44100_128,
        }
    }
}

/// Text-to-speech engine interface.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Start synthesis and return the audio as a stream of chunks.
    async fn stream_speech(&self, request: &SpeechRequest<'_>) -> Result<AudioStream>;
}
