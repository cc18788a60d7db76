//! Inline `data:` URIs carrying base64 encoded audio.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

/// MIME type announced for synthesized speech.
pub const MP3_MIME: &str = "audio/mp3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data URI")]
    NotDataUri,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Payload(String),
}

/// Decoded contents of a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Wrap `bytes` as `data:<mime>;base64,<payload>`.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Wrap MP3 audio as a playable `data:audio/mp3;base64,` URI.
pub fn encode_mp3(bytes: &[u8]) -> String {
    encode(MP3_MIME, bytes)
}

/// Parse a base64 `data:` URI back into its MIME type and bytes.
pub fn decode(uri: &str) -> Result<DataUri, DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::NotDataUri)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| DataUriError::Payload(e.to_string()))?;
    Ok(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}
