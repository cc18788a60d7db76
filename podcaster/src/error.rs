//! Conversion of service failures into JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use llm::ScriptError;
use shared::ErrorResponse;
use thiserror::Error;
use tracing::error;
use tts::SpeechError;

/// Failure of an API request, rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Missing prompt parameter")]
    MissingPrompt,
    #[error("{0}")]
    RejectedScript(ScriptError),
    #[error("Failed to generate script")]
    ScriptFailed,
    #[error("Missing required parameters")]
    MissingAudioInput,
    #[error("Failed to generate audio")]
    AudioFailed,
    #[error("Failed to generate voice preview")]
    PreviewFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody
            | ApiError::MissingPrompt
            | ApiError::RejectedScript(_)
            | ApiError::MissingAudioInput => StatusCode::BAD_REQUEST,
            ApiError::ScriptFailed | ApiError::AudioFailed | ApiError::PreviewFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Map any failure of a voice preview, including a blank voice id.
    pub fn preview(err: SpeechError) -> Self {
        error!(error = %err, "error generating voice preview");
        ApiError::PreviewFailed
    }
}

impl From<ScriptError> for ApiError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::MissingInput => ApiError::MissingPrompt,
            ScriptError::Upstream(e) => {
                error!(error = %e, "error generating script");
                ApiError::ScriptFailed
            }
            rejected => ApiError::RejectedScript(rejected),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::MissingInput => ApiError::MissingAudioInput,
            SpeechError::Synthesis(e) => {
                error!(error = %e, "error generating audio");
                ApiError::AudioFailed
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
