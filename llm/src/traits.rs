use async_trait::async_trait;
use thiserror::Error;

use crate::model::ChatRequest;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run a chat completion and return the first choice's content.
    ///
    /// `Ok(None)` means the provider answered without any content.
    async fn complete(&self, request: ChatRequest) -> Result<Option<String>, LLMError>;
}
