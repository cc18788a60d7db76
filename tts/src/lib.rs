//! Turn podcast scripts into playable audio.
//!
//! A [`Synthesizer`] streams encoded audio chunks from a voice provider;
//! [`SpeechService`] drains that stream and wraps the result as a
//! `data:audio/mp3;base64,` URI.

pub mod elevenlabs;
pub mod speech;
pub mod traits;

pub use elevenlabs::ElevenLabsTts;
pub use speech::{SpeechError, SpeechService, SynthesizedAudio, PREVIEW_TEXT};
pub use traits::{AudioStream, OutputFormat, SpeechRequest, Synthesizer, SYNTHESIS_MODEL};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TTSError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("voice provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("audio stream failed: {0}")]
    Stream(String),
    #[error("invalid voice id {0:?}")]
    InvalidVoice(String),
    #[error("voice provider returned no audio")]
    EmptyAudio,
}

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, TTSError>;
